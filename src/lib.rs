//! # Driver for ILI9340 TFT displays
//!
//! The ILI9340 drives 240x320 color TFT panels over a write-only SPI-style
//! bus with an extra data/command line. This crate talks to it through the
//! [`backend::ILI9340Backend`] abstraction, so the drawing code works the
//! same on a hardware SPI peripheral, on bit-banged GPIOs, or on a recorded
//! byte stream in tests.
//!
//! The main entry point is [`ILI9340`]:
//!  - [`ILI9340::new`] resets the controller and replays the vendor
//!    bring-up sequence
//!  - pixel, line and rectangle primitives stream packed RGB565 colors into
//!    an address window
//!  - [`ILI9340::draw_string`] and the [`core::fmt::Write`] impl render the
//!    embedded 6x8 font
//!
//! With the `graphics` cargo feature the driver also implements
//! `embedded_graphics_core::draw_target::DrawTarget` for `Rgb565`, so the
//! whole embedded-graphics ecosystem can draw on it.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod color;
pub mod dummypins;
pub mod font;
pub mod instructions;

mod display;
#[cfg(feature = "graphics")]
mod drawtarget;
mod graphics;
#[cfg(test)]
pub(crate) mod testing;
mod textmode;

pub use crate::backend::{ILI9340Backend, ILI9340GpioBackend, ILI9340SpiBackend, SpiBackendError};
pub use crate::display::ILI9340;
pub use crate::instructions::{Instruction, Rotation};
pub use crate::textmode::{CELL_HEIGHT, CELL_WIDTH};

/// Panel width in pixels before rotation.
pub const WIDTH: u16 = 240;

/// Panel height in pixels before rotation.
pub const HEIGHT: u16 = 320;
