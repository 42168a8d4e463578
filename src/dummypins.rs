//! # Small module to provide a "fake" pin
//!
//! Some display modules strap a control line in hardware: CS tied to
//! ground on single-device buses, or the backlight wired straight to the
//! supply. The constructors still want an `OutputPin` for every line, so
//! this provides one that accepts every call and does nothing.
//!
//! The host-side demo and the unit tests also use it wherever a real pin
//! is beside the point.

use embedded_hal::digital::v2::OutputPin;

/// An `OutputPin` that ignores all writes and never fails.
#[derive(Debug, Clone, Copy)]
pub struct DummyOutputPin;

impl OutputPin for DummyOutputPin {
    type Error = core::convert::Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
