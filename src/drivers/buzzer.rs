//! Piezo buzzer on an LEDC PWM channel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: LEDC low-speed timer 1 / channel 1 at 4 kHz, 10-bit
//! resolution.  "On" is a 50 % duty square wave, "off" is duty 0.
//! On host/test: tracks state in-memory only.

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub const BUZZER_FREQ_HZ: u32 = 4_000;
/// 50 % of the 10-bit range.
pub const BUZZER_DUTY_ON: u32 = 512;

#[cfg(target_os = "espidf")]
const LEDC_TIMER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_1;
#[cfg(target_os = "espidf")]
const LEDC_CHANNEL: ledc_channel_t = ledc_channel_t_LEDC_CHANNEL_1;
#[cfg(target_os = "espidf")]
const LEDC_MODE: ledc_mode_t = ledc_mode_t_LEDC_LOW_SPEED_MODE;

pub struct Buzzer {
    gpio: i32,
    on: bool,
}

impl Buzzer {
    /// Configure the LEDC timer and channel, silent.
    #[cfg(target_os = "espidf")]
    pub fn new(gpio: i32) -> Result<Self, HwInitError> {
        let timer = ledc_timer_config_t {
            speed_mode: LEDC_MODE,
            timer_num: LEDC_TIMER,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
            freq_hz: BUZZER_FREQ_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: single-threaded init path from main().
        let ret = unsafe { ledc_timer_config(&timer) };
        if ret != ESP_OK {
            return Err(HwInitError::LedcInitFailed(ret));
        }

        let channel = ledc_channel_config_t {
            speed_mode: LEDC_MODE,
            channel: LEDC_CHANNEL,
            timer_sel: LEDC_TIMER,
            intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: as above.
        let ret = unsafe { ledc_channel_config(&channel) };
        if ret != ESP_OK {
            return Err(HwInitError::LedcInitFailed(ret));
        }

        log::info!("buzzer: GPIO {} at {} Hz", gpio, BUZZER_FREQ_HZ);
        Ok(Self { gpio, on: false })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(gpio: i32) -> Result<Self, HwInitError> {
        log::info!("buzzer(sim): GPIO {}", gpio);
        Ok(Self { gpio, on: false })
    }

    pub fn on(&mut self) {
        self.set_duty(BUZZER_DUTY_ON);
        self.on = true;
    }

    pub fn off(&mut self) {
        self.set_duty(0);
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    #[cfg(target_os = "espidf")]
    fn set_duty(&self, duty: u32) {
        // SAFETY: channel configured in new(); only the control loop writes it.
        unsafe {
            ledc_set_duty(LEDC_MODE, LEDC_CHANNEL, duty);
            ledc_update_duty(LEDC_MODE, LEDC_CHANNEL);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_duty(&self, _duty: u32) {}
}
