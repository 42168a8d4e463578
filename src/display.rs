//! # Main driver module for the ILI9340
//!
//! This holds the state of the display (logical size, colors, cursor,
//! scroll start) and the operations every drawing layer builds on: the
//! bring-up sequence, command/data framing over the backend, the address
//! window, and windowed color fills.
//!
//! Drawing happens by setting an address window (an inclusive rectangle of
//! frame memory) and streaming 16-bit RGB565 pixels into it; the controller
//! advances its own write pointer row by row. The line, rectangle and text
//! layers in the sibling modules reduce everything to that pattern.
//!
//! Typically you want to look at the following functions:
//!  - [`ILI9340::new`] to create and bring up a driver instance
//!  - [`ILI9340::fill_rect`] and friends to draw
//!  - [`ILI9340::set_rotation`] to pick one of the four orientations

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::backend::ILI9340Backend;
use crate::color;
use crate::instructions::{Instruction, Rotation};
use crate::{HEIGHT, WIDTH};

/// Pixels per chunk when streaming a solid color.
const CHUNK_PIXELS: usize = 32;

/// Register table replayed at bring-up, byte for byte from the vendor
/// recommendation: undocumented pump/timing registers, power and VCOM
/// levels, MADCTL, 16-bit pixel format, frame rate and the two gamma
/// curves.
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (0xef, &[0x03, 0x80, 0x02]),
    (0xcf, &[0x00, 0xc1, 0x30]),
    (0xed, &[0x64, 0x03, 0x12, 0x81]),
    (0xe8, &[0x85, 0x00, 0x78]),
    (0xcb, &[0x39, 0x2c, 0x00, 0x34, 0x02]),
    (0xf7, &[0x20]),
    (0xea, &[0x00, 0x00]),
    (0xc0, &[0x23]),
    (0xc1, &[0x10]),
    (0xc5, &[0x3e, 0x28]),
    (0xc7, &[0x86]),
    (0x36, &[0x48]),
    (0x3a, &[0x55]),
    (0xb1, &[0x00, 0x18]),
    (0xb6, &[0x08, 0x82, 0x27]),
    (0xf2, &[0x00]),
    (0x26, &[0x01]),
    (
        0xe0,
        &[
            0x0f, 0x31, 0x2b, 0x0c, 0x0e, 0x08, 0x4e, 0xf1, 0x37, 0x07, 0x10, 0x03, 0x0e, 0x09,
            0x00,
        ],
    ),
    (
        0xe1,
        &[
            0x00, 0x0e, 0x14, 0x03, 0x11, 0x07, 0x31, 0xc1, 0x48, 0x08, 0x0f, 0x0c, 0x31, 0x36,
            0x0f,
        ],
    ),
];

/// Driver state and spine for all drawing operations.
///
/// Owns the bus backend and the reset pin. The logical width and height
/// track the current rotation; colors and cursor feed the text layer.
pub struct ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    backend: B,
    rst: RST,
    width: u16,
    height: u16,
    pub(crate) cursor_x: u16,
    pub(crate) cursor_y: u16,
    pub(crate) foreground: u16,
    pub(crate) background: u16,
    scroll_start: u16,
}

impl<B, RST> ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    /// Creates a new driver instance and brings the controller up.
    ///
    /// Arguments:
    ///
    /// - backend: the bus transport, see [`crate::backend`]
    /// - rst: GPIO OutputPin connected to the RESET line of the display
    /// - delay: timer for the fixed reset and wake-up waits
    pub fn new<D: DelayMs<u8>>(backend: B, rst: RST, delay: &mut D) -> Result<Self, B::Error> {
        let mut display = ILI9340 {
            backend,
            rst,
            width: WIDTH,
            height: HEIGHT,
            cursor_x: 0,
            cursor_y: 0,
            foreground: color::WHITE,
            background: color::BLACK,
            scroll_start: 0,
        };
        display.reset(delay)?;
        Ok(display)
    }

    /// Hardware-resets and re-initializes the controller.
    ///
    /// The controller state after power-on is undefined, so [`ILI9340::new`]
    /// always runs this once; calling it again restarts from a clean slate,
    /// including the driver's own state record.
    pub fn reset<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), B::Error> {
        self.rst.set_high()?;
        delay.delay_ms(5);
        self.rst.set_low()?;
        delay.delay_ms(20);
        self.rst.set_high()?;
        delay.delay_ms(150);

        for &(opcode, params) in INIT_SEQUENCE {
            self.write_opcode(opcode)?;
            self.write_data(params)?;
        }

        self.write_command(Instruction::SleepOut)?;
        delay.delay_ms(120);
        self.write_command(Instruction::DisplayOn)?;

        self.width = WIDTH;
        self.height = HEIGHT;
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.foreground = color::WHITE;
        self.background = color::BLACK;
        self.scroll_start = 0;
        Ok(())
    }

    fn write_opcode(&mut self, opcode: u8) -> Result<(), B::Error> {
        self.backend.write_byte(false, opcode)
    }

    /// Sends a single instruction to the controller.
    pub fn write_command(&mut self, instruction: Instruction) -> Result<(), B::Error> {
        self.write_opcode(instruction.byte())
    }

    /// Sends parameter or pixel bytes in data framing.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), B::Error> {
        self.backend.write_bytes(true, data)
    }

    fn write_data16(&mut self, value: u16) -> Result<(), B::Error> {
        self.write_data(&value.to_be_bytes())
    }

    /// Selects the inclusive window `x0..=x1`, `y0..=y1` and opens frame
    /// memory for writing at its origin.
    pub fn set_address_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), B::Error> {
        self.write_command(Instruction::ColumnAddressSet)?;
        self.write_data(&[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8])?;
        self.write_command(Instruction::PageAddressSet)?;
        self.write_data(&[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8])?;
        self.write_command(Instruction::MemoryWrite)
    }

    /// Streams one pixel into the open address window.
    pub fn push_color(&mut self, color: u16) -> Result<(), B::Error> {
        self.write_data(&color.to_be_bytes())
    }

    // Streams `count` pixels of one color in fixed-size chunks.
    pub(crate) fn push_colors(&mut self, color: u16, count: u32) -> Result<(), B::Error> {
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }
        let mut remaining = count;
        while remaining > 0 {
            let pixels = remaining.min(CHUNK_PIXELS as u32) as usize;
            self.write_data(&chunk[..pixels * 2])?;
            remaining -= pixels as u32;
        }
        Ok(())
    }

    /// Draws a single pixel. Out-of-bounds coordinates are ignored.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), B::Error> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return Ok(());
        }
        self.set_address_window(x as u16, y as u16, x as u16, y as u16)?;
        self.push_color(color)
    }

    /// Fills a rectangle, truncated at every screen edge.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: u16,
    ) -> Result<(), B::Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let right = x + i32::from(width) - 1;
        let bottom = y + i32::from(height) - 1;
        if right < 0 || bottom < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return Ok(());
        }
        let x0 = x.max(0) as u16;
        let y0 = y.max(0) as u16;
        let x1 = right.min(i32::from(self.width) - 1) as u16;
        let y1 = bottom.min(i32::from(self.height) - 1) as u16;

        self.set_address_window(x0, y0, x1, y1)?;
        let count = u32::from(x1 - x0 + 1) * u32::from(y1 - y0 + 1);
        self.push_colors(color, count)
    }

    /// Fills the whole screen.
    pub fn fill_screen(&mut self, color: u16) -> Result<(), B::Error> {
        let (width, height) = (self.width, self.height);
        self.fill_rect(0, 0, width, height, color)
    }

    /// Rotates the display output by rewriting MemoryAccessControl.
    ///
    /// The logical width and height swap for the landscape orientations;
    /// frame memory itself never moves.
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), B::Error> {
        self.write_command(Instruction::MemoryAccessControl)?;
        self.write_data(&[rotation.madctl()])?;
        if rotation.swaps_axes() {
            self.width = HEIGHT;
            self.height = WIDTH;
        } else {
            self.width = WIDTH;
            self.height = HEIGHT;
        }
        Ok(())
    }

    /// Sets the frame memory line displayed first, scrolling the panel
    /// vertically without touching pixel data.
    pub fn set_scroll_start(&mut self, start: u16) -> Result<(), B::Error> {
        self.write_command(Instruction::VerticalScrollStartAddress)?;
        self.write_data16(start)?;
        self.scroll_start = start;
        Ok(())
    }

    /// Defines the fixed top and bottom margins of the scrolling region.
    ///
    /// The three areas have to cover the panel height, so the scrolling
    /// middle is derived from the current height minus both margins.
    pub fn set_scroll_margins(&mut self, top: u16, bottom: u16) -> Result<(), B::Error> {
        let area = self.height.saturating_sub(top).saturating_sub(bottom);
        self.write_command(Instruction::VerticalScrollDefinition)?;
        self.write_data16(top)?;
        self.write_data16(area)?;
        self.write_data16(bottom)
    }

    /// Color used for set glyph bits by the text layer.
    pub fn set_foreground(&mut self, color: u16) {
        self.foreground = color;
    }

    /// Color used for cleared glyph bits and separator columns.
    pub fn set_background(&mut self, color: u16) {
        self.background = color;
    }

    pub fn foreground(&self) -> u16 {
        self.foreground
    }

    pub fn background(&self) -> u16 {
        self.background
    }

    /// Logical width in pixels under the current rotation.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Logical height in pixels under the current rotation.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn scroll_start(&self) -> u16 {
        self.scroll_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummypins::DummyOutputPin;
    use crate::testing::{NoDelay, RecordingBackend};

    fn new_display(tap: &RecordingBackend) -> ILI9340<RecordingBackend, DummyOutputPin> {
        let display = ILI9340::new(tap.clone(), DummyOutputPin, &mut NoDelay).unwrap();
        tap.clear();
        display
    }

    #[test]
    fn bring_up_replays_init_table_and_wakes_the_panel() {
        let tap = RecordingBackend::new();
        let _display = ILI9340::new(tap.clone(), DummyOutputPin, &mut NoDelay).unwrap();

        let frame = tap.frame();
        let opcodes: std::vec::Vec<u8> =
            frame.commands.iter().map(|(opcode, _)| *opcode).collect();
        assert_eq!(opcodes[0], 0xef);
        assert_eq!(
            &opcodes[opcodes.len() - 2..],
            &[Instruction::SleepOut as u8, Instruction::DisplayOn as u8]
        );
        assert_eq!(frame.params(0x3a), Some(&[0x55][..]));
        assert_eq!(frame.params(0x36), Some(&[0x48][..]));
    }

    #[test]
    fn bring_up_defaults() {
        let tap = RecordingBackend::new();
        let display = new_display(&tap);
        assert_eq!(display.width(), 240);
        assert_eq!(display.height(), 320);
        assert_eq!(display.foreground(), 0xffff);
        assert_eq!(display.background(), 0x0000);
        assert_eq!(display.scroll_start(), 0);
    }

    #[test]
    fn address_window_boundaries_are_big_endian_inclusive() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.set_address_window(1, 2, 238, 319).unwrap();

        let frame = tap.frame();
        assert_eq!(frame.params(0x2a), Some(&[0x00, 0x01, 0x00, 0xee][..]));
        assert_eq!(frame.params(0x2b), Some(&[0x00, 0x02, 0x01, 0x3f][..]));
        assert_eq!(frame.commands.last().unwrap().0, 0x2c);
    }

    #[test]
    fn fill_rect_streams_every_window_pixel() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.fill_rect(10, 20, 4, 3, 0xf800).unwrap();

        let frame = tap.frame();
        assert_eq!(frame.pixels.len(), 12);
        for x in 10..14u16 {
            for y in 20..23u16 {
                assert_eq!(frame.pixels.get(&(x, y)), Some(&0xf800));
            }
        }
    }

    #[test]
    fn fill_rect_truncates_at_right_and_bottom() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.fill_rect(230, 310, 20, 20, 0x07e0).unwrap();

        let frame = tap.frame();
        assert_eq!(frame.params(0x2a), Some(&[0x00, 0xe6, 0x00, 0xef][..]));
        assert_eq!(frame.params(0x2b), Some(&[0x01, 0x36, 0x01, 0x3f][..]));
        assert_eq!(frame.pixels.len(), 100);
        assert!(frame.coords().iter().all(|&(x, y)| x < 240 && y < 320));
    }

    #[test]
    fn fill_rect_truncates_at_left_and_top() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.fill_rect(-3, -2, 5, 4, 0xffff).unwrap();

        let expected: std::collections::BTreeSet<(u16, u16)> =
            [(0, 0), (0, 1), (1, 0), (1, 1)].iter().cloned().collect();
        assert_eq!(tap.frame().coords(), expected);
    }

    #[test]
    fn off_screen_and_empty_rects_transfer_nothing() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.fill_rect(240, 0, 4, 4, 0xffff).unwrap();
        display.fill_rect(0, 320, 4, 4, 0xffff).unwrap();
        display.fill_rect(-10, -10, 5, 5, 0xffff).unwrap();
        display.fill_rect(10, 10, 0, 5, 0xffff).unwrap();

        assert!(tap.frame().commands.is_empty());
    }

    #[test]
    fn draw_pixel_out_of_bounds_is_ignored() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.draw_pixel(-1, 0, 0xffff).unwrap();
        display.draw_pixel(0, -1, 0xffff).unwrap();
        display.draw_pixel(240, 0, 0xffff).unwrap();
        display.draw_pixel(0, 320, 0xffff).unwrap();
        assert!(tap.frame().commands.is_empty());

        display.draw_pixel(239, 319, 0x001f).unwrap();
        let frame = tap.frame();
        assert_eq!(frame.pixels.get(&(239, 319)), Some(&0x001f));
        assert_eq!(frame.pixels.len(), 1);
    }

    #[test]
    fn rotation_swaps_dimensions_and_rewrites_madctl() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);
        let cases: [(Rotation, u16, u16, u8); 4] = [
            (Rotation::Portrait, 240, 320, 0x48),
            (Rotation::Landscape, 320, 240, 0x28),
            (Rotation::PortraitFlipped, 240, 320, 0x88),
            (Rotation::LandscapeFlipped, 320, 240, 0xe8),
        ];

        for &(rotation, width, height, madctl) in cases.iter() {
            tap.clear();
            display.set_rotation(rotation).unwrap();
            assert_eq!(display.width(), width);
            assert_eq!(display.height(), height);
            assert_eq!(tap.frame().params(0x36), Some(&[madctl][..]));
        }
    }

    #[test]
    fn fill_screen_covers_the_rotated_dimensions() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);
        display.set_rotation(Rotation::Landscape).unwrap();
        tap.clear();

        display.fill_screen(0x0000).unwrap();

        let frame = tap.frame();
        assert_eq!(frame.params(0x2a), Some(&[0x00, 0x00, 0x01, 0x3f][..]));
        assert_eq!(frame.params(0x2b), Some(&[0x00, 0x00, 0x00, 0xef][..]));
        assert_eq!(frame.pixels.len(), 320 * 240);
    }

    #[test]
    fn scroll_start_is_sent_and_recorded() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.set_scroll_start(40).unwrap();

        assert_eq!(display.scroll_start(), 40);
        assert_eq!(tap.frame().params(0x37), Some(&[0x00, 0x28][..]));
    }

    #[test]
    fn scroll_margins_partition_the_panel_height() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.set_scroll_margins(10, 10).unwrap();

        // 10 + 300 + 10 = 320 lines
        assert_eq!(
            tap.frame().params(0x33),
            Some(&[0x00, 0x0a, 0x01, 0x2c, 0x00, 0x0a][..])
        );
    }

    #[test]
    fn oversized_scroll_margins_saturate() {
        let tap = RecordingBackend::new();
        let mut display = new_display(&tap);

        display.set_scroll_margins(300, 100).unwrap();

        assert_eq!(
            tap.frame().params(0x33),
            Some(&[0x01, 0x2c, 0x00, 0x00, 0x00, 0x64][..])
        );
    }
}
