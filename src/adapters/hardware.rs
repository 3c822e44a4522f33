//! Hardware adapter — bridges real peripherals to the actuator port.
//!
//! Owns the backlight and the (optional) buzzer, exposing them through
//! [`ActuatorPort`].  On non-espidf targets the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::ActuatorPort;
use crate::drivers::backlight::Backlight;
use crate::drivers::buzzer::Buzzer;

/// Concrete adapter that combines the on/off outputs behind one port.
pub struct HardwareAdapter<P> {
    backlight: Backlight<P>,
    /// `None` on boards without a buzzer (alarm is visual only).
    buzzer: Option<Buzzer>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(backlight: Backlight<P>, buzzer: Option<Buzzer>) -> Self {
        Self { backlight, buzzer }
    }

    pub fn backlight(&self) -> &Backlight<P> {
        &self.backlight
    }

    pub fn buzzer(&self) -> Option<&Buzzer> {
        self.buzzer.as_ref()
    }
}

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn backlight_on(&mut self) {
        self.backlight.set(true);
    }

    fn backlight_off(&mut self) {
        self.backlight.set(false);
    }

    fn alarm_on(&mut self) {
        if let Some(buzzer) = self.buzzer.as_mut() {
            buzzer.on();
        }
    }

    fn alarm_off(&mut self) {
        if let Some(buzzer) = self.buzzer.as_mut() {
            buzzer.off();
        }
    }
}
