//! Peripheral drivers and one-shot hardware initialisation.

pub mod backlight;
pub mod button;
pub mod buzzer;
pub mod encoder;
pub mod hw_init;
pub mod hw_timer;
