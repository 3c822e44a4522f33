//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  StateTable                                          │
//! │  ┌──────────┬──────────────────────────────────────┐ │
//! │  │ State    │ on_event                             │ │
//! │  ├──────────┼──────────────────────────────────────┤ │
//! │  │ Setup    │ fn(app, input, limits) -> ActionSet  │ │
//! │  │ Running  │ fn(app, input, limits) -> ActionSet  │ │
//! │  │ Alarm    │ fn(app, input, limits) -> ActionSet  │ │
//! │  │ Sleep    │ fn(app, input, limits) -> ActionSet  │ │
//! │  └──────────┴──────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! [`process_event`] looks up the handler for the **current** state and
//! lets it mutate [`AppState`] in place.  Handlers never touch hardware:
//! they return an [`ActionSet`] describing the side effects the
//! dispatcher must perform.  The whole module is pure and deterministic.

pub mod actions;
pub mod states;

use log::info;

pub use actions::{Action, ActionSet};

use crate::events::Event;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Top-level appliance state.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerState {
    /// Selecting the brew duration.
    Setup = 0,
    /// Counting down.
    Running = 1,
    /// Finished, flashing and beeping.
    Alarm = 2,
    /// Display off.
    Sleep = 3,
}

impl TimerState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 4;

    pub const ALL: [TimerState; Self::COUNT] = [
        TimerState::Setup,
        TimerState::Running,
        TimerState::Alarm,
        TimerState::Sleep,
    ];
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The single record the transition function mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub state: TimerState,
    /// Selected brew duration (seconds).
    pub target_seconds: u32,
    /// Countdown remaining (seconds), never above `target_seconds`.
    pub remaining_seconds: u32,
    /// Last raw encoder count already accounted for.
    pub last_encoder_baseline: i32,
    /// Alarm flash phase.
    pub alarm_flash_on: bool,
}

impl AppState {
    /// Power-on state: Setup with the given target.
    pub fn new(target_seconds: u32) -> Self {
        Self {
            state: TimerState::Setup,
            target_seconds,
            remaining_seconds: target_seconds,
            last_encoder_baseline: 0,
            alarm_flash_on: false,
        }
    }

    /// Arc fill percentage for the display (0 – 100).
    pub fn progress(&self) -> u8 {
        if self.target_seconds == 0 {
            return 100;
        }

        match self.state {
            TimerState::Setup => 100,
            TimerState::Running | TimerState::Alarm => {
                let pct = u64::from(self.remaining_seconds) * 100 / u64::from(self.target_seconds);
                pct.min(100) as u8
            }
            TimerState::Sleep => 0,
        }
    }

    /// Seconds to show: remaining while counting or alarming, target otherwise.
    pub fn displayed_seconds(&self) -> u32 {
        match self.state {
            TimerState::Running | TimerState::Alarm => self.remaining_seconds,
            TimerState::Setup | TimerState::Sleep => self.target_seconds,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(300)
    }
}

// ---------------------------------------------------------------------------
// Duration limits
// ---------------------------------------------------------------------------

/// Bounds and scaling for encoder-driven duration selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationLimits {
    pub min_seconds: u32,
    pub max_seconds: u32,
    pub step_seconds: u32,
    /// Raw encoder counts per physical detent.
    pub counts_per_detent: i32,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            min_seconds: 60,
            max_seconds: 600,
            step_seconds: 60,
            counts_per_detent: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Handler input
// ---------------------------------------------------------------------------

/// What a state handler sees for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub event: Event,
    /// Encoder count associated with the event: the `EncoderChange`
    /// payload, otherwise the count the loop sampled when it consumed the
    /// event.  `None` leaves the baseline untouched.
    pub value: Option<i32>,
}

/// Signature for a per-state event handler.
pub type StateEventFn = fn(&mut AppState, Input, &DurationLimits) -> ActionSet;

/// Static descriptor for a single state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: TimerState,
    pub name: &'static str,
    pub on_event: StateEventFn,
}

static STATE_TABLE: [StateDescriptor; TimerState::COUNT] = states::build_state_table();

/// Name of a state as used in transition logs.
pub fn state_name(state: TimerState) -> &'static str {
    STATE_TABLE[state as usize].name
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Apply one event to `app` and return the side effects it requests.
///
/// `sampled_count` is the encoder count observed by the caller when the
/// event was consumed; it is ignored for `EncoderChange`, which carries its
/// own count.
pub fn process_event(
    app: &mut AppState,
    event: Event,
    sampled_count: Option<i32>,
    limits: &DurationLimits,
) -> ActionSet {
    let input = Input {
        event,
        value: event.encoder_count().or(sampled_count),
    };

    let from = app.state;
    let descriptor = &STATE_TABLE[from as usize];
    debug_assert_eq!(descriptor.id, from);

    let actions = (descriptor.on_event)(app, input, limits);

    if app.state != from {
        info!(
            "FSM transition: {} -> {} on {:?}",
            descriptor.name,
            state_name(app.state),
            event
        );
    }

    actions
}
