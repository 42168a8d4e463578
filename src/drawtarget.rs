//! embedded-graphics support, behind the `graphics` cargo feature.
//!
//! Implementing DrawTarget for Rgb565 hands the display to the whole
//! embedded-graphics ecosystem: circles, text in other fonts, bitmaps.
//! There is no framebuffer involved; pixels go straight to the panel, with
//! solid rectangles taking the windowed fast path and everything else
//! falling back to per-pixel writes.

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::raw::{RawData, RawU16},
    pixelcolor::Rgb565,
    primitives::Rectangle,
    Pixel,
};
use embedded_hal::digital::v2::OutputPin;

use crate::backend::ILI9340Backend;
use crate::display::ILI9340;

fn raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

impl<B, RST> DrawTarget for ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    type Color = Rgb565;
    type Error = B::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, raw(color))?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        let width = area.size.width.min(u32::from(u16::MAX)) as u16;
        let height = area.size.height.min(u32::from(u16::MAX)) as u16;
        self.fill_rect(area.top_left.x, area.top_left.y, width, height, raw(color))
    }

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_screen(raw(color))
    }
}

impl<B, RST> OriginDimensions for ILI9340<B, RST>
where
    B: ILI9340Backend,
    RST: OutputPin<Error = B::Error>,
{
    // embedded-graphics asks for the drawable size, which follows the
    // current rotation.
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}
