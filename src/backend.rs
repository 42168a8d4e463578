//! # Bus backends for the ILI9340
//!
//! The controller listens on a write-only synchronous serial link with two
//! extra control lines: CS (chip select, active low) and D/C (data/command,
//! low while a command byte is on the wire). Everything the driver sends
//! goes through [`ILI9340Backend`], so the rendering code never touches
//! pins directly and can run against a fake backend in tests.
//!
//! Two implementations are provided:
//!  - [`ILI9340SpiBackend`] for a hardware SPI peripheral plus D/C and CS
//!    GPIOs, the setup to prefer when an SPI port is available
//!  - [`ILI9340GpioBackend`] bit-banging clock and data on plain GPIOs

use embedded_hal::{blocking::spi::Write as SpiWrite, digital::v2::OutputPin};

/// Byte-level transport to the ILI9340 with data/command framing.
///
/// `data` selects the level of the D/C line for the transfer: `true` for
/// display data and command parameters, `false` for command opcodes.
pub trait ILI9340Backend {
    type Error;

    /// Write a slice of bytes in one chip-select window.
    ///
    /// Pixel streaming depends on CS staying low for the whole slice, so the
    /// controller treats it as one continuous memory write.
    fn write_bytes(&mut self, data: bool, values: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte.
    fn write_byte(&mut self, data: bool, value: u8) -> Result<(), Self::Error> {
        self.write_bytes(data, &[value])
    }
}

/// Error of [`ILI9340SpiBackend`], keeping pin and SPI failures apart.
#[derive(Debug)]
pub enum SpiBackendError<PinErr, SpiErr> {
    Pin(PinErr),
    Spi(SpiErr),
}

/// Backend using a hardware SPI peripheral.
pub struct ILI9340SpiBackend<SPI, DC, CS>
where
    SPI: SpiWrite<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS, PinErr, SpiErr> ILI9340SpiBackend<SPI, DC, CS>
where
    SPI: SpiWrite<u8, Error = SpiErr>,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
{
    pub fn new(spi: SPI, dc: DC, mut cs: CS) -> Result<ILI9340SpiBackend<SPI, DC, CS>, PinErr> {
        cs.set_high()?;
        Ok(ILI9340SpiBackend { spi, dc, cs })
    }
}

impl<SPI, DC, CS, PinErr, SpiErr> ILI9340Backend for ILI9340SpiBackend<SPI, DC, CS>
where
    SPI: SpiWrite<u8, Error = SpiErr>,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
{
    type Error = SpiBackendError<PinErr, SpiErr>;

    fn write_bytes(
        &mut self,
        data: bool,
        values: &[u8],
    ) -> Result<(), SpiBackendError<PinErr, SpiErr>> {
        if data {
            self.dc.set_high().map_err(SpiBackendError::Pin)?;
        } else {
            self.dc.set_low().map_err(SpiBackendError::Pin)?;
        }
        self.cs.set_low().map_err(SpiBackendError::Pin)?;
        self.spi.write(values).map_err(SpiBackendError::Spi)?;
        self.cs.set_high().map_err(SpiBackendError::Pin)
    }
}

/// Backend bit-banging the bus on GPIOs, MSB first with the clock idling
/// low. Use when no SPI port is free; the display accepts any clock rate a
/// GPIO can produce.
pub struct ILI9340GpioBackend<CLK, DIN, DC, CS>
where
    CLK: OutputPin,
    DIN: OutputPin,
    DC: OutputPin,
    CS: OutputPin,
{
    clk: CLK,
    din: DIN,
    dc: DC,
    cs: CS,
}

impl<CLK, DIN, DC, CS, ERR> ILI9340GpioBackend<CLK, DIN, DC, CS>
where
    CLK: OutputPin<Error = ERR>,
    DIN: OutputPin<Error = ERR>,
    DC: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
{
    pub fn new(
        mut clk: CLK,
        din: DIN,
        dc: DC,
        mut cs: CS,
    ) -> Result<ILI9340GpioBackend<CLK, DIN, DC, CS>, ERR> {
        clk.set_low()?;
        cs.set_high()?;
        Ok(ILI9340GpioBackend { clk, din, dc, cs })
    }

    fn write_bit(&mut self, high: bool) -> Result<(), ERR> {
        if high {
            self.din.set_high()?;
        } else {
            self.din.set_low()?;
        }
        self.clk.set_high()?;
        self.clk.set_low()
    }
}

impl<CLK, DIN, DC, CS, ERR> ILI9340Backend for ILI9340GpioBackend<CLK, DIN, DC, CS>
where
    CLK: OutputPin<Error = ERR>,
    DIN: OutputPin<Error = ERR>,
    DC: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
{
    type Error = ERR;

    fn write_bytes(&mut self, data: bool, values: &[u8]) -> Result<(), ERR> {
        if data {
            self.dc.set_high()?;
        } else {
            self.dc.set_low()?;
        }
        self.cs.set_low()?;
        for value in values {
            let mut value = *value;
            for _ in 0..8 {
                self.write_bit((value & 0x80) == 0x80)?;
                value <<= 1;
            }
        }
        self.cs.set_high()
    }
}
