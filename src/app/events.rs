//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today they go to the serial log.

use crate::fsm::TimerState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The control loop has started (carries initial state and target).
    Started { state: TimerState, target_seconds: u32 },

    /// The FSM transitioned between states.
    StateChanged { from: TimerState, to: TimerState },

    /// A brew finished and the alarm is sounding.
    AlarmRaised { target_seconds: u32 },

    /// The alarm was silenced by the user.
    AlarmDismissed,
}
