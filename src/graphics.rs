//! # Line and rectangle primitives for the ILI9340
//!
//! Everything here reduces to address windows and solid color runs. The
//! fast paths matter: a horizontal or vertical run is a single window plus
//! a burst of identical pixels, which is an order of magnitude fewer bus
//! transfers than per-pixel windows. The general line breaks itself into
//! such runs with the run-length variant of Bresenham's algorithm, so even
//! shallow diagonals mostly travel as bursts.
//!
//! Coordinates may lie off screen; all primitives truncate to the visible
//! area and never transfer pixels outside it.

use embedded_hal::digital::v2::OutputPin;

use crate::backend::ILI9340Backend;
use crate::display::ILI9340;

impl<B, RST> ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    /// Draws a horizontal run of `width` pixels starting at `(x, y)`,
    /// truncated at both screen edges.
    pub fn draw_fast_hline(&mut self, x: i32, y: i32, width: u16, color: u16) -> Result<(), B::Error> {
        if width == 0 || y < 0 || y >= i32::from(self.height()) {
            return Ok(());
        }
        let right = x + i32::from(width) - 1;
        if right < 0 || x >= i32::from(self.width()) {
            return Ok(());
        }
        let x0 = x.max(0) as u16;
        let x1 = right.min(i32::from(self.width()) - 1) as u16;
        self.set_address_window(x0, y as u16, x1, y as u16)?;
        self.push_colors(color, u32::from(x1 - x0 + 1))
    }

    /// Draws a vertical run of `height` pixels starting at `(x, y)`,
    /// truncated at both screen edges.
    pub fn draw_fast_vline(&mut self, x: i32, y: i32, height: u16, color: u16) -> Result<(), B::Error> {
        if height == 0 || x < 0 || x >= i32::from(self.width()) {
            return Ok(());
        }
        let bottom = y + i32::from(height) - 1;
        if bottom < 0 || y >= i32::from(self.height()) {
            return Ok(());
        }
        let y0 = y.max(0) as u16;
        let y1 = bottom.min(i32::from(self.height()) - 1) as u16;
        self.set_address_window(x as u16, y0, x as u16, y1)?;
        self.push_colors(color, u32::from(y1 - y0 + 1))
    }

    /// Draws a line between two points.
    ///
    /// Axis-aligned lines dispatch to the fast runs. Everything else is
    /// integer Bresenham, accumulating pixels of equal minor coordinate
    /// into runs. The painted pixel set does not depend on the order of
    /// the endpoints.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) -> Result<(), B::Error> {
        if y0 == y1 {
            return if x1 > x0 {
                self.draw_fast_hline(x0, y0, (x1 - x0 + 1) as u16, color)
            } else if x1 < x0 {
                self.draw_fast_hline(x1, y0, (x0 - x1 + 1) as u16, color)
            } else {
                self.draw_pixel(x0, y0, color)
            };
        }
        if x0 == x1 {
            return if y1 > y0 {
                self.draw_fast_vline(x0, y0, (y1 - y0 + 1) as u16, color)
            } else {
                self.draw_fast_vline(x0, y1, (y0 - y1 + 1) as u16, color)
            };
        }

        // walk the major axis as x; steep lines swap the axes and emit
        // vertical runs instead
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let (mut x0, mut y0, mut x1, mut y1) = if steep {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;
        let mut xbegin = x0;
        let mut x = x0;
        while x <= x1 {
            err -= dy;
            if err < 0 {
                let len = x - xbegin;
                if steep {
                    if len > 0 {
                        self.draw_fast_vline(y, xbegin, (len + 1) as u16, color)?;
                    } else {
                        self.draw_pixel(y, x, color)?;
                    }
                } else if len > 0 {
                    self.draw_fast_hline(xbegin, y, (len + 1) as u16, color)?;
                } else {
                    self.draw_pixel(x, y, color)?;
                }
                xbegin = x + 1;
                y += ystep;
                err += dx;
            }
            x += 1;
        }
        if x > xbegin {
            if steep {
                self.draw_fast_vline(y, xbegin, (x - xbegin) as u16, color)?;
            } else {
                self.draw_fast_hline(xbegin, y, (x - xbegin) as u16, color)?;
            }
        }
        Ok(())
    }

    /// Draws a rectangle with a one pixel `outline` and the interior
    /// filled with `fill`.
    pub fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        outline: u16,
        fill: u16,
    ) -> Result<(), B::Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        if width > 2 && height > 2 {
            self.fill_rect(x + 1, y + 1, width - 2, height - 2, fill)?;
        }
        self.draw_fast_vline(x, y, height, outline)?;
        self.draw_fast_vline(x + i32::from(width) - 1, y, height, outline)?;
        if width > 2 {
            self.draw_fast_hline(x + 1, y, width - 2, outline)?;
            self.draw_fast_hline(x + 1, y + i32::from(height) - 1, width - 2, outline)?;
        }
        Ok(())
    }
}
