//! System configuration parameters
//!
//! All tunable parameters for the tea timer.  The defaults are the
//! values the appliance ships with; there is no persistence, so the
//! config is fixed at boot and dumped to the log as JSON.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fsm::DurationLimits;

/// Depth of the ISR → control-loop event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 10;

/// Core timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    // --- Brew duration ---
    /// Shortest selectable brew time (seconds)
    pub min_seconds: u32,
    /// Longest selectable brew time (seconds)
    pub max_seconds: u32,
    /// Adjustment per encoder detent (seconds)
    pub step_seconds: u32,
    /// Brew time selected at power-on (seconds)
    pub default_seconds: u32,

    // --- Encoder ---
    /// Raw PCNT counts per physical detent
    pub counts_per_detent: i32,

    // --- Power ---
    /// Idle time in Setup before the display sleeps (milliseconds)
    pub inactivity_timeout_ms: u64,

    // --- Timing ---
    /// Countdown tick period (milliseconds)
    pub countdown_tick_ms: u32,
    /// Alarm flash tick period (milliseconds)
    pub flash_tick_ms: u32,
    /// Bounded wait on the event channel per loop iteration (milliseconds)
    pub receive_timeout_ms: u32,

    // --- Audio ---
    /// Drive the buzzer while the alarm is active
    pub audio_enabled: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            // Brew duration
            min_seconds: 60,      // 1 min
            max_seconds: 600,     // 10 min
            step_seconds: 60,     // 1 min per detent
            default_seconds: 300, // 5 min

            // Encoder
            counts_per_detent: 4,

            // Power
            inactivity_timeout_ms: 60_000,

            // Timing
            countdown_tick_ms: 1000, // 1 Hz
            flash_tick_ms: 500,      // 2 Hz
            receive_timeout_ms: 10,

            // Audio
            audio_enabled: true,
        }
    }
}

/// Reasons a [`TimerConfig`] is rejected at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl TimerConfig {
    /// Reject values the state machine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_seconds == 0 {
            return Err(ConfigError::ValidationFailed("step_seconds must be > 0"));
        }
        if self.min_seconds == 0 {
            return Err(ConfigError::ValidationFailed("min_seconds must be > 0"));
        }
        if self.min_seconds > self.max_seconds {
            return Err(ConfigError::ValidationFailed(
                "min_seconds must not exceed max_seconds",
            ));
        }
        if self.min_seconds % self.step_seconds != 0 || self.max_seconds % self.step_seconds != 0 {
            return Err(ConfigError::ValidationFailed(
                "duration bounds must lie on the step grid",
            ));
        }
        if self.counts_per_detent <= 0 {
            return Err(ConfigError::ValidationFailed("counts_per_detent must be > 0"));
        }
        if self.countdown_tick_ms == 0 || self.flash_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick periods must be > 0"));
        }
        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("receive_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// Duration bounds and encoder scaling used by the transition function.
    pub fn limits(&self) -> DurationLimits {
        DurationLimits {
            min_seconds: self.min_seconds,
            max_seconds: self.max_seconds,
            step_seconds: self.step_seconds,
            counts_per_detent: self.counts_per_detent,
        }
    }

    /// Power-on target, clamped into range and snapped down onto the step grid.
    pub fn initial_target(&self) -> u32 {
        let clamped = self.default_seconds.clamp(self.min_seconds, self.max_seconds);
        let snapped = clamped - clamped % self.step_seconds.max(1);
        snapped.max(self.min_seconds)
    }

    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.countdown_tick_ms))
    }

    pub fn flash_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.flash_tick_ms))
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.receive_timeout_ms))
    }
}
