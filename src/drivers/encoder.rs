//! Quadrature rotary encoder on the PCNT peripheral.
//!
//! ## Hardware
//!
//! Both encoder phases feed one PCNT unit through two channels (edge on
//! one phase, level on the other, and the reverse) so every edge of both
//! phases is counted.  A 1 µs glitch filter drops contact bounce.  The
//! unit counts within ±32767; the control loop only ever compares counts,
//! so the absolute value carries no meaning.
//!
//! A failed count read repeats the last good count, so a bus error never
//! looks like a turn.
//!
//! On non-espidf targets the count is a plain field that tests can set,
//! and a read fault can be injected.

use crate::app::ports::EncoderPort;

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// PCNT counter range (symmetric).
pub const PCNT_LIMIT: i32 = 32_767;
/// Pulses narrower than this are ignored.
pub const GLITCH_FILTER_NS: u32 = 1_000;

pub struct PcntEncoder {
    #[cfg(target_os = "espidf")]
    unit: pcnt_unit_handle_t,
    #[cfg(not(target_os = "espidf"))]
    sim_count: i32,
    #[cfg(not(target_os = "espidf"))]
    sim_fault: Option<i32>,
    last_good: i32,
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t) -> Result<(), HwInitError> {
    if ret == ESP_OK {
        Ok(())
    } else {
        Err(HwInitError::PcntInitFailed(ret))
    }
}

impl PcntEncoder {
    /// Configure the PCNT unit on `pin_a`/`pin_b`, clear it and start counting.
    #[cfg(target_os = "espidf")]
    pub fn new(pin_a: i32, pin_b: i32) -> Result<Self, HwInitError> {
        let mut unit: pcnt_unit_handle_t = core::ptr::null_mut();

        // SAFETY: called once from main() during init; the handles created
        // here are owned by this driver for the lifetime of the firmware.
        unsafe {
            let unit_cfg = pcnt_unit_config_t {
                low_limit: -PCNT_LIMIT,
                high_limit: PCNT_LIMIT,
                ..Default::default()
            };
            check(pcnt_new_unit(&unit_cfg, &mut unit))?;

            let filter = pcnt_glitch_filter_config_t {
                max_glitch_ns: GLITCH_FILTER_NS,
            };
            check(pcnt_unit_set_glitch_filter(unit, &filter))?;

            // Channel A: edge on A, level on B
            let mut chan_a: pcnt_channel_handle_t = core::ptr::null_mut();
            let cfg_a = pcnt_chan_config_t {
                edge_gpio_num: pin_a,
                level_gpio_num: pin_b,
                ..Default::default()
            };
            check(pcnt_new_channel(unit, &cfg_a, &mut chan_a))?;
            check(pcnt_channel_set_edge_action(
                chan_a,
                pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_INCREASE,
                pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_DECREASE,
            ))?;
            check(pcnt_channel_set_level_action(
                chan_a,
                pcnt_channel_level_action_t_PCNT_CHANNEL_LEVEL_ACTION_KEEP,
                pcnt_channel_level_action_t_PCNT_CHANNEL_LEVEL_ACTION_INVERSE,
            ))?;

            // Channel B: edge on B, level on A (full quadrature)
            let mut chan_b: pcnt_channel_handle_t = core::ptr::null_mut();
            let cfg_b = pcnt_chan_config_t {
                edge_gpio_num: pin_b,
                level_gpio_num: pin_a,
                ..Default::default()
            };
            check(pcnt_new_channel(unit, &cfg_b, &mut chan_b))?;
            check(pcnt_channel_set_edge_action(
                chan_b,
                pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_DECREASE,
                pcnt_channel_edge_action_t_PCNT_CHANNEL_EDGE_ACTION_INCREASE,
            ))?;
            check(pcnt_channel_set_level_action(
                chan_b,
                pcnt_channel_level_action_t_PCNT_CHANNEL_LEVEL_ACTION_KEEP,
                pcnt_channel_level_action_t_PCNT_CHANNEL_LEVEL_ACTION_INVERSE,
            ))?;

            check(pcnt_unit_enable(unit))?;
            check(pcnt_unit_clear_count(unit))?;
            check(pcnt_unit_start(unit))?;
        }

        log::info!("encoder: PCNT started on GPIO {}/{}", pin_a, pin_b);
        Ok(Self { unit, last_good: 0 })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(pin_a: i32, pin_b: i32) -> Result<Self, HwInitError> {
        log::info!("encoder(sim): GPIO {}/{}", pin_a, pin_b);
        Ok(Self {
            sim_count: 0,
            sim_fault: None,
            last_good: 0,
        })
    }

    /// Current absolute count.  A failed read logs and returns the last
    /// good count.
    pub fn read(&mut self) -> i32 {
        match self.raw_count() {
            Ok(count) => {
                self.last_good = count;
                count
            }
            Err(rc) => {
                log::warn!(
                    "encoder: count read failed (rc={}), holding {}",
                    rc,
                    self.last_good
                );
                self.last_good
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn raw_count(&self) -> Result<i32, esp_err_t> {
        let mut count: i32 = 0;
        // SAFETY: the unit handle was created in new() and is never freed.
        let ret = unsafe { pcnt_unit_get_count(self.unit, &mut count) };
        if ret == ESP_OK { Ok(count) } else { Err(ret) }
    }

    #[cfg(not(target_os = "espidf"))]
    fn raw_count(&self) -> Result<i32, i32> {
        match self.sim_fault {
            Some(rc) => Err(rc),
            None => Ok(self.sim_count),
        }
    }

    /// Simulation hook: set the value the next read returns.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_count(&mut self, count: i32) {
        self.sim_count = count.clamp(-PCNT_LIMIT, PCNT_LIMIT);
    }

    /// Simulation hook: make reads fail with `rc` until cleared with `None`.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_fault(&mut self, rc: Option<i32>) {
        self.sim_fault = rc;
    }
}

impl EncoderPort for PcntEncoder {
    fn count(&mut self) -> i32 {
        self.read()
    }
}
