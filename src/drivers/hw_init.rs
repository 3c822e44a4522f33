//! One-shot hardware peripheral initialization.
//!
//! Error type shared by every driver constructor, plus the GPIO ISR
//! service the button handler is registered on.  Called once from
//! `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    PcntInitFailed(i32),
    LedcInitFailed(i32),
    TimerCreateFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::PcntInitFailed(rc) => write!(f, "PCNT unit setup failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::TimerCreateFailed(rc) => write!(f, "esp_timer create failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Install the per-pin GPIO ISR service.
/// Call before registering any pin handler.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).
    let ret = unsafe { gpio_install_isr_service(0) };
    if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    log::info!("hw_init: GPIO ISR service installed");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
