//! # Text rendering for the ILI9340
//!
//! Characters come from the embedded 5x8 font and occupy a 6x8 pixel cell:
//! five glyph columns plus one blank separator column, drawn in the
//! foreground and background colors of the driver state. A whole cell is
//! one address window and one 96 byte burst, so text stays fast even over
//! a slow bus.
//!
//! [`ILI9340::draw_char`] and [`ILI9340::draw_string`] take explicit pixel
//! coordinates for callers that manage their own layout (a terminal
//! keeping a character grid, for instance). The `core::fmt::Write`
//! implementation instead tracks a cursor in the driver state, so
//! `write!(display, "...")` works like a teletype: it advances cell by
//! cell, wraps at the right edge and understands `\r` and `\n`.

use core::fmt::Error as FmtError;
use core::fmt::Result as FmtResult;
use core::fmt::Write;

use embedded_hal::digital::v2::OutputPin;

use crate::backend::ILI9340Backend;
use crate::display::ILI9340;
use crate::font;

/// Width of one character cell in pixels, glyph plus separator column.
pub const CELL_WIDTH: u16 = 6;

/// Height of one character cell in pixels.
pub const CELL_HEIGHT: u16 = 8;

impl<B, RST> ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    /// Draws the cell for `c` with its top left corner at `(x, y)`.
    ///
    /// Cells that do not fit on screen in their entirety are ignored.
    pub fn draw_char(&mut self, x: i32, y: i32, c: u8) -> Result<(), B::Error> {
        if x < 0
            || y < 0
            || x + i32::from(CELL_WIDTH) > i32::from(self.width())
            || y + i32::from(CELL_HEIGHT) > i32::from(self.height())
        {
            return Ok(());
        }

        let glyph = font::glyph(c);
        let fg = self.foreground().to_be_bytes();
        let bg = self.background().to_be_bytes();

        // the cell streams row-major: 5 glyph columns, then the separator
        let mut cell = [0u8; CELL_WIDTH as usize * CELL_HEIGHT as usize * 2];
        let mut offset = 0;
        for row in 0..CELL_HEIGHT as u8 {
            for &column in glyph {
                let pixel = if column & (1 << row) != 0 { fg } else { bg };
                cell[offset] = pixel[0];
                cell[offset + 1] = pixel[1];
                offset += 2;
            }
            cell[offset] = bg[0];
            cell[offset + 1] = bg[1];
            offset += 2;
        }

        self.set_address_window(
            x as u16,
            y as u16,
            x as u16 + CELL_WIDTH - 1,
            y as u16 + CELL_HEIGHT - 1,
        )?;
        self.write_data(&cell)
    }

    /// Draws a string byte-wise, advancing one cell per character.
    ///
    /// No line handling: characters that would stick out of the screen are
    /// dropped by [`ILI9340::draw_char`].
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str) -> Result<(), B::Error> {
        let mut x = x;
        for c in text.bytes() {
            self.draw_char(x, y, c)?;
            x += i32::from(CELL_WIDTH);
        }
        Ok(())
    }

    /// Position of the text cursor in pixels.
    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    /// Moves the text cursor. The next `write!` output starts here.
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }
}

impl<B, RST> Write for ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    // With write_str in place all the standard Write functions work on the
    // display, in particular the write!/writeln! macros.
    fn write_str(&mut self, s: &str) -> FmtResult {
        for c in s.chars() {
            match c {
                '\r' => self.cursor_x = 0,
                '\n' => {
                    self.cursor_x = 0;
                    self.cursor_y = self.cursor_y.saturating_add(CELL_HEIGHT);
                }
                _ => {
                    if self.cursor_x.saturating_add(CELL_WIDTH) > self.width() {
                        self.cursor_x = 0;
                        self.cursor_y = self.cursor_y.saturating_add(CELL_HEIGHT);
                    }
                    let code = if (c as u32) < 256 { c as u8 } else { b'?' };
                    let (x, y) = (i32::from(self.cursor_x), i32::from(self.cursor_y));
                    self.draw_char(x, y, code).map_err(|_| FmtError)?;
                    self.cursor_x += CELL_WIDTH;
                }
            }
        }
        Ok(())
    }
}
