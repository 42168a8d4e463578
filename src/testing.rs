//! Test doubles shared by the unit tests: a backend that records the byte
//! stream, and a decoder that replays it against the controller's
//! addressing rules so tests can assert on windows and pixels instead of
//! raw bytes.

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::delay::DelayMs;

use crate::backend::ILI9340Backend;
use crate::instructions::Instruction;

/// Delay that returns immediately, for bring-up in tests.
pub(crate) struct NoDelay;

impl DelayMs<u8> for NoDelay {
    fn delay_ms(&mut self, _ms: u8) {}
}

/// Backend recording every framed byte. Clones share the same log, so a
/// test can keep one handle while the display owns the other.
#[derive(Clone, Default)]
pub(crate) struct RecordingBackend {
    writes: Rc<RefCell<Vec<(bool, u8)>>>,
}

impl RecordingBackend {
    pub fn new() -> RecordingBackend {
        RecordingBackend::default()
    }

    /// Forget everything recorded so far (usually the bring-up sequence).
    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn frame(&self) -> Frame {
        Frame::decode(&self.writes.borrow())
    }
}

impl ILI9340Backend for RecordingBackend {
    type Error = Infallible;

    fn write_bytes(&mut self, data: bool, values: &[u8]) -> Result<(), Infallible> {
        let mut writes = self.writes.borrow_mut();
        for value in values {
            writes.push((data, *value));
        }
        Ok(())
    }
}

/// A recorded byte stream decoded into commands and frame memory writes.
///
/// The decoder models the controller's write pointer: ColumnAddressSet and
/// PageAddressSet define the window, MemoryWrite resets the pointer to the
/// window origin, and every 16-bit pixel advances it row by row, wrapping
/// at the window edges.
pub(crate) struct Frame {
    /// Every command in order of appearance, with its parameter bytes.
    pub commands: Vec<(u8, Vec<u8>)>,
    /// Last color written to each touched coordinate.
    pub pixels: BTreeMap<(u16, u16), u16>,
}

impl Frame {
    pub fn decode(writes: &[(bool, u8)]) -> Frame {
        const CASET: u8 = Instruction::ColumnAddressSet as u8;
        const PASET: u8 = Instruction::PageAddressSet as u8;
        const RAMWR: u8 = Instruction::MemoryWrite as u8;

        fn boundaries(params: &[u8]) -> Option<(u16, u16)> {
            if params.len() == 4 {
                Some((
                    u16::from_be_bytes([params[0], params[1]]),
                    u16::from_be_bytes([params[2], params[3]]),
                ))
            } else {
                None
            }
        }

        let mut commands: Vec<(u8, Vec<u8>)> = Vec::new();
        let mut pixels = BTreeMap::new();
        let mut col = (0u16, 0u16);
        let mut page = (0u16, 0u16);
        let mut cursor = (0u16, 0u16);
        let mut pending_hi: Option<u8> = None;

        for &(data, byte) in writes {
            if !data {
                // the previous command is complete; apply window updates
                if let Some((opcode, params)) = commands.last() {
                    match (*opcode, boundaries(params)) {
                        (CASET, Some(range)) => col = range,
                        (PASET, Some(range)) => page = range,
                        _ => {}
                    }
                }
                if byte == RAMWR {
                    cursor = (col.0, page.0);
                    pending_hi = None;
                }
                commands.push((byte, Vec::new()));
            } else if let Some((opcode, params)) = commands.last_mut() {
                params.push(byte);
                if *opcode == RAMWR {
                    match pending_hi.take() {
                        None => pending_hi = Some(byte),
                        Some(hi) => {
                            pixels.insert(cursor, u16::from_be_bytes([hi, byte]));
                            if cursor.0 == col.1 {
                                cursor.0 = col.0;
                                cursor.1 = if cursor.1 == page.1 { page.0 } else { cursor.1 + 1 };
                            } else {
                                cursor.0 += 1;
                            }
                        }
                    }
                }
            }
        }

        Frame { commands, pixels }
    }

    /// Parameter bytes of the most recent occurrence of `opcode`.
    pub fn params(&self, opcode: u8) -> Option<&[u8]> {
        self.commands
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == opcode)
            .map(|(_, params)| params.as_slice())
    }

    /// All coordinates that received a pixel.
    pub fn coords(&self) -> BTreeSet<(u16, u16)> {
        self.pixels.keys().cloned().collect()
    }
}
