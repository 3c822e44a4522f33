//! Inactivity tracking.
//!
//! Remembers when the user last turned the dial or pressed the button and
//! decides when the Setup screen should go to sleep.  Timestamps are
//! monotonic milliseconds supplied by the caller, so the tracker itself is
//! pure and host-testable.

use log::info;

use crate::events::Event;
use crate::fsm::TimerState;

pub struct InactivityTracker {
    timeout_ms: u64,
    last_activity_ms: u64,
}

impl InactivityTracker {
    pub fn new(timeout_ms: u64, now_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_activity_ms: now_ms,
        }
    }

    /// Reset the idle clock.  Call when a button/encoder event is consumed.
    pub fn record_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    /// Milliseconds since the last recorded activity.
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity_ms)
    }

    /// Synthesise one `InactivityTimeout` once the idle period has elapsed
    /// in Setup.  The clock is reset immediately so it does not refire
    /// before another full period.
    pub fn poll(&mut self, state: TimerState, now_ms: u64) -> Option<Event> {
        if state != TimerState::Setup {
            return None;
        }
        if self.idle_ms(now_ms) < self.timeout_ms {
            return None;
        }
        info!("inactivity: idle for {} ms, sleeping", self.idle_ms(now_ms));
        self.last_activity_ms = now_ms;
        Some(Event::InactivityTimeout)
    }
}
