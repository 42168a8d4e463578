use std::fmt::Write;

use embedded_hal::blocking::delay::DelayMs;
use ili9340::color;
use ili9340::dummypins::DummyOutputPin;
use ili9340::{ILI9340, ILI9340GpioBackend, Rotation};

struct NoDelay;

impl DelayMs<u8> for NoDelay {
    fn delay_ms(&mut self, _ms: u8) {}
}

fn main() {
    let clk = DummyOutputPin;
    let din = DummyOutputPin;
    let dc = DummyOutputPin;
    let cs = DummyOutputPin;
    let rst = DummyOutputPin;

    let backend = ILI9340GpioBackend::new(clk, din, dc, cs).expect("Infallible cannot fail");
    let mut display =
        ILI9340::new(backend, rst, &mut NoDelay).expect("Infallible cannot fail");

    display.set_rotation(Rotation::Landscape).expect("Infallible cannot fail");
    display.fill_screen(color::BLACK).expect("Infallible cannot fail");
    display
        .draw_rect(10, 10, 120, 40, color::WHITE, color::BLUE)
        .expect("Infallible cannot fail");
    display.set_background(color::BLUE);
    display
        .draw_string(16, 26, "Hello World")
        .expect("Infallible cannot fail");

    display.set_background(color::BLACK);
    display.set_cursor(16, 60);
    writeln!(display, "1 + 2 = {}", 1 + 2).unwrap();
}
