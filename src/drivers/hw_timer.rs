//! Restartable tick clocks on ESP-IDF's esp_timer API.
//!
//! Each [`EspClock`] owns one esp_timer whose callback pushes a tick
//! event into the static channel.  Callbacks run in the esp_timer task
//! (not ISR), and only ever do a non-blocking send.
//!
//! On non-espidf targets the clock only records whether it is running,
//! which is enough for the simulation build.

use core::time::Duration;

use crate::app::ports::PeriodicClock;
use crate::events::Event;

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Which tick a clock produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    /// 1 Hz countdown → `Tick1Hz`.
    Countdown,
    /// Alarm flash cadence → `TickFast`.
    Flash,
}

impl ClockKind {
    pub fn event(self) -> Event {
        match self {
            Self::Countdown => Event::Tick1Hz,
            Self::Flash => Event::TickFast,
        }
    }

    #[cfg(target_os = "espidf")]
    fn name(self) -> &'static core::ffi::CStr {
        match self {
            Self::Countdown => c"countdown",
            Self::Flash => c"flash",
        }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn countdown_tick_cb(_arg: *mut core::ffi::c_void) {
    let _ = crate::events::push_event(ClockKind::Countdown.event());
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn flash_tick_cb(_arg: *mut core::ffi::c_void) {
    let _ = crate::events::push_event(ClockKind::Flash.event());
}

pub struct EspClock {
    kind: ClockKind,
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(not(target_os = "espidf"))]
    running: bool,
}

impl EspClock {
    /// Create the timer.  It stays idle until started.
    #[cfg(target_os = "espidf")]
    pub fn new(kind: ClockKind) -> Result<Self, HwInitError> {
        let callback: unsafe extern "C" fn(*mut core::ffi::c_void) = match kind {
            ClockKind::Countdown => countdown_tick_cb,
            ClockKind::Flash => flash_tick_cb,
        };
        let args = esp_timer_create_args_t {
            callback: Some(callback),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: kind.name().as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: called once per clock from main(); the handle is owned by
        // this clock and never deleted.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            return Err(HwInitError::TimerCreateFailed(ret));
        }
        log::info!("hw_timer: {:?} clock created", kind);
        Ok(Self { kind, handle })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(kind: ClockKind) -> Result<Self, HwInitError> {
        Ok(Self {
            kind,
            running: false,
        })
    }

    pub fn kind(&self) -> ClockKind {
        self.kind
    }
}

#[cfg(target_os = "espidf")]
impl PeriodicClock for EspClock {
    fn start_periodic(&mut self, period: Duration) {
        self.stop();
        // SAFETY: handle is valid for the lifetime of self.
        let ret = unsafe { esp_timer_start_periodic(self.handle, period.as_micros() as u64) };
        if ret != ESP_OK {
            log::warn!("hw_timer: {:?} start_periodic failed (rc={})", self.kind, ret);
        }
    }

    fn start_once(&mut self, delay: Duration) {
        self.stop();
        // SAFETY: handle is valid for the lifetime of self.
        let ret = unsafe { esp_timer_start_once(self.handle, delay.as_micros() as u64) };
        if ret != ESP_OK {
            log::warn!("hw_timer: {:?} start_once failed (rc={})", self.kind, ret);
        }
    }

    fn stop(&mut self) {
        // SAFETY: handle is valid; ESP_ERR_INVALID_STATE just means the
        // timer was not running.
        let ret = unsafe { esp_timer_stop(self.handle) };
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            log::warn!("hw_timer: {:?} stop failed (rc={})", self.kind, ret);
        }
    }

    fn is_running(&self) -> bool {
        // SAFETY: handle is valid for the lifetime of self.
        unsafe { esp_timer_is_active(self.handle) }
    }
}

#[cfg(not(target_os = "espidf"))]
impl PeriodicClock for EspClock {
    fn start_periodic(&mut self, period: Duration) {
        log::trace!("hw_timer(sim): {:?} every {:?}", self.kind, period);
        self.running = true;
    }

    fn start_once(&mut self, delay: Duration) {
        log::trace!("hw_timer(sim): {:?} once after {:?}", self.kind, delay);
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
