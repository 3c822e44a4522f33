//! Push button on a falling-edge GPIO interrupt.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled.  A
//! press bounces for a few milliseconds, so the ISR keeps the time of the
//! last accepted edge and drops any edge closer than [`DEBOUNCE_MS`] to
//! it.  One physical press therefore enqueues exactly one `ButtonPress`.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::events::{Event, EventChannel, EVENTS};

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Minimum spacing between two accepted press edges.
pub const DEBOUNCE_MS: u32 = 50;

/// Timestamp filter for press edges.
///
/// Written only from the button ISR, so plain loads and stores on the
/// atomics are enough.
#[derive(Debug, Default)]
pub struct EdgeDebounce {
    last_accepted_ms: AtomicU32,
    seen: AtomicBool,
}

impl EdgeDebounce {
    pub const fn new() -> Self {
        Self {
            last_accepted_ms: AtomicU32::new(0),
            seen: AtomicBool::new(false),
        }
    }

    /// Whether an edge at `now_ms` is a new press rather than bounce.
    pub fn accept(&self, now_ms: u32) -> bool {
        if self.seen.load(Ordering::Acquire)
            && now_ms.wrapping_sub(self.last_accepted_ms.load(Ordering::Relaxed)) < DEBOUNCE_MS
        {
            return false;
        }
        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.seen.store(true, Ordering::Release);
        true
    }
}

static BUTTON_DEBOUNCE: EdgeDebounce = EdgeDebounce::new();

/// Debounce one falling edge and enqueue a press if it is accepted.
/// Returns `true` only when a `ButtonPress` landed in `channel`.
pub fn press_edge(debounce: &EdgeDebounce, channel: &EventChannel, now_ms: u32) -> bool {
    debounce.accept(now_ms) && channel.push(Event::ButtonPress)
}

/// ISR body — register on the button GPIO falling edge.
/// Lock-free: two atomics and a non-blocking channel send.
pub fn button_isr_handler(now_ms: u32) -> bool {
    press_edge(&BUTTON_DEBOUNCE, &EVENTS, now_ms)
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is callable from ISR context.
    let now_ms = (unsafe { esp_timer_get_time() } / 1000) as u32;
    let _ = button_isr_handler(now_ms);
}

/// Configure `pin` as a pulled-up input and attach the ISR.
/// [`init_isr_service`](super::hw_init::init_isr_service) must run first.
#[cfg(target_os = "espidf")]
pub fn init_button(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: single-threaded init path; the handler is a static fn that
    // only pushes to the event channel.
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        let ret = gpio_isr_handler_add(pin, Some(button_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pin);
    }
    log::info!("button: falling-edge ISR on GPIO {}", pin);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button(pin: i32) -> Result<(), HwInitError> {
    log::info!("button(sim): GPIO {}", pin);
    Ok(())
}
