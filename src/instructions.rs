//! # Module defining the instruction set of the ILI9340
//!
//! Only the instructions the driver issues at runtime are modeled here; the
//! bring-up writes a fixed register table that is replayed byte for byte
//! (see the init sequence in the display module) and does not need names.
//! The data sheet can be found here:
//! <https://cdn-shop.adafruit.com/datasheets/ILI9340.pdf>
//!
//! A short tour of the interesting ones:
//!
//! ## Address window (ColumnAddressSet / PageAddressSet / MemoryWrite)
//! Drawing on the ILI9340 always happens through a rectangular window.
//! ColumnAddressSet and PageAddressSet each take two 16-bit boundaries
//! (inclusive), then MemoryWrite opens the frame memory: every following
//! 16-bit pixel lands at the write pointer, which walks the window row by
//! row and wraps back to the start. That makes filled shapes a single
//! command sequence plus a burst of identical pixel data.
//!
//! ## MemoryAccessControl
//! One byte of axis flags (see [`madctl`]) deciding how the write pointer
//! maps to the glass: row/column exchange, mirroring, and RGB/BGR filter
//! order. Rotation is implemented entirely with this register; frame memory
//! never moves.
//!
//! ## Vertical scrolling
//! VerticalScrollDefinition splits the panel into a top fixed area, a
//! scrolling middle, and a bottom fixed area (the three have to add up to
//! the 320 physical lines). VerticalScrollStartAddress then picks the frame
//! memory line shown first, which lets a terminal scroll without rewriting
//! frame memory.

/// Bits of the MemoryAccessControl byte.
pub mod madctl {
    /// Row address order (vertical flip).
    pub const MY: u8 = 0x80;
    /// Column address order (horizontal flip).
    pub const MX: u8 = 0x40;
    /// Row/column exchange (landscape).
    pub const MV: u8 = 0x20;
    /// Vertical refresh order.
    pub const ML: u8 = 0x10;
    /// BGR color filter panel order.
    pub const BGR: u8 = 0x08;
    /// Horizontal refresh order.
    pub const MH: u8 = 0x04;
}

/// ILI9340 instructions used by the driver, with their data sheet opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Instruction {
    /// Leave sleep mode; needs 120 ms before the next command.
    SleepOut = 0x11,

    /// Start displaying frame memory.
    DisplayOn = 0x29,

    /// Set the column (x) range of the address window, two inclusive
    /// 16-bit boundaries.
    ColumnAddressSet = 0x2a,

    /// Set the page (y) range of the address window.
    PageAddressSet = 0x2b,

    /// Open frame memory for pixel data at the window start.
    MemoryWrite = 0x2c,

    /// Define top/scrolling/bottom areas for vertical scroll.
    VerticalScrollDefinition = 0x33,

    /// Axis flags, see [`madctl`].
    MemoryAccessControl = 0x36,

    /// First frame memory line to display, for vertical scroll.
    VerticalScrollStartAddress = 0x37,
}

impl Instruction {
    /// Returns the instruction opcode as it goes on the wire.
    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// The four display orientations.
///
/// Rotation only rewrites MemoryAccessControl; the panel stays a 240x320
/// frame memory underneath and the driver swaps its logical width and
/// height to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Rotation {
    /// 240x320, connector at the bottom.
    Portrait = 0,
    /// 320x240, rotated clockwise once.
    Landscape = 1,
    /// 240x320, upside down.
    PortraitFlipped = 2,
    /// 320x240, rotated clockwise three times.
    LandscapeFlipped = 3,
}

impl Rotation {
    /// The MemoryAccessControl byte for this orientation.
    pub fn madctl(self) -> u8 {
        use self::madctl::*;
        match self {
            Rotation::Portrait => MX | BGR,
            Rotation::Landscape => MV | BGR,
            Rotation::PortraitFlipped => MY | BGR,
            Rotation::LandscapeFlipped => MV | MY | MX | BGR,
        }
    }

    /// Whether this orientation exchanges the x and y axes.
    pub fn swaps_axes(self) -> bool {
        match self {
            Rotation::Portrait | Rotation::PortraitFlipped => false,
            Rotation::Landscape | Rotation::LandscapeFlipped => true,
        }
    }
}

impl From<u8> for Rotation {
    /// Interprets any byte modulo 4, matching the controller's four
    /// possible orientations.
    fn from(value: u8) -> Rotation {
        match value % 4 {
            0 => Rotation::Portrait,
            1 => Rotation::Landscape,
            2 => Rotation::PortraitFlipped,
            _ => Rotation::LandscapeFlipped,
        }
    }
}
