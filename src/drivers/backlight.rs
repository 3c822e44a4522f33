//! Display backlight on a digital output.
//!
//! Generic over [`embedded_hal::digital::OutputPin`] so the firmware can
//! hand it an `esp_idf_hal` `PinDriver` and tests a recording pin.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct Backlight<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Backlight<P> {
    /// Takes ownership of the pin; the backlight starts off.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            warn!("backlight: set_low failed: {:?}", e);
        }
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.on = on,
            Err(e) => warn!("backlight: pin write failed: {:?}", e),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
