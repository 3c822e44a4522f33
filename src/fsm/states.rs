//! Concrete state handler functions and table builder.
//!
//! Each state is a single plain `fn` pointer — no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!            [button]                 [last tick]
//!   SETUP ───────────▶ RUNNING ───────────────────▶ ALARM
//!    ▲ │ ◀──[button]──────┘                            │
//!    │ │                                               │
//!    │ └──[inactivity]──▶ SLEEP                        │
//!    │                      │                          │
//!    └──[button/encoder]────┴────[button/encoder]──────┘
//! ```

use log::debug;

use super::{Action, ActionSet, AppState, DurationLimits, Input, StateDescriptor, TimerState};
use crate::events::Event;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.
pub const fn build_state_table() -> [StateDescriptor; TimerState::COUNT] {
    [
        // Index 0 — Setup
        StateDescriptor {
            id: TimerState::Setup,
            name: "Setup",
            on_event: setup_event,
        },
        // Index 1 — Running
        StateDescriptor {
            id: TimerState::Running,
            name: "Running",
            on_event: running_event,
        },
        // Index 2 — Alarm
        StateDescriptor {
            id: TimerState::Alarm,
            name: "Alarm",
            on_event: alarm_event,
        },
        // Index 3 — Sleep
        StateDescriptor {
            id: TimerState::Sleep,
            name: "Sleep",
            on_event: sleep_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETUP state — selecting the brew time
// ═══════════════════════════════════════════════════════════════════════════

fn setup_event(app: &mut AppState, input: Input, limits: &DurationLimits) -> ActionSet {
    match input.event {
        Event::ButtonPress => {
            app.state = TimerState::Running;
            app.remaining_seconds = app.target_seconds;
            ActionSet::of(&[Action::UpdateUi, Action::StartTimer])
        }
        Event::EncoderChange(count) => adjust_target(app, count, limits),
        Event::InactivityTimeout => {
            app.state = TimerState::Sleep;
            ActionSet::of(&[Action::UpdateUi, Action::BacklightOff])
        }
        Event::Tick1Hz | Event::TickFast => ActionSet::empty(),
    }
}

/// Convert an absolute encoder count into whole-detent duration steps.
///
/// The baseline advances only by the counts actually consumed, so a
/// partial detent carries over to the next movement.
pub fn adjust_target(app: &mut AppState, new_count: i32, limits: &DurationLimits) -> ActionSet {
    let per_detent = limits.counts_per_detent.max(1);
    let delta = new_count.wrapping_sub(app.last_encoder_baseline);
    let clicks = delta / per_detent;

    if clicks == 0 {
        return ActionSet::empty();
    }

    app.last_encoder_baseline = app
        .last_encoder_baseline
        .wrapping_add(clicks.wrapping_mul(per_detent));

    let proposed = i64::from(app.target_seconds) + i64::from(clicks) * i64::from(limits.step_seconds);
    let clamped = proposed.clamp(i64::from(limits.min_seconds), i64::from(limits.max_seconds));
    app.target_seconds = clamped as u32;
    app.remaining_seconds = app.target_seconds;

    debug!(
        "SETUP: {} click(s), target now {}s (baseline {})",
        clicks, app.target_seconds, app.last_encoder_baseline
    );

    ActionSet::of(&[Action::UpdateUi])
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state — counting down
// ═══════════════════════════════════════════════════════════════════════════

fn running_event(app: &mut AppState, input: Input, _limits: &DurationLimits) -> ActionSet {
    match input.event {
        Event::ButtonPress => {
            // Cancel
            app.state = TimerState::Setup;
            app.remaining_seconds = app.target_seconds;
            ActionSet::of(&[Action::UpdateUi, Action::StopTimer])
        }
        Event::Tick1Hz => {
            if app.remaining_seconds == 0 {
                return ActionSet::empty();
            }
            app.remaining_seconds -= 1;
            let mut actions = ActionSet::of(&[Action::UpdateUi]);

            if app.remaining_seconds == 0 {
                app.state = TimerState::Alarm;
                app.alarm_flash_on = true;
                actions |= Action::StopTimer;
                actions |= Action::AlarmStart;
            }
            actions
        }
        Event::EncoderChange(count) => {
            // Time is locked while brewing; track the dial so returning to
            // Setup does not see a jump.
            app.last_encoder_baseline = count;
            ActionSet::empty()
        }
        Event::TickFast | Event::InactivityTimeout => ActionSet::empty(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARM state — brew finished
// ═══════════════════════════════════════════════════════════════════════════

fn alarm_event(app: &mut AppState, input: Input, _limits: &DurationLimits) -> ActionSet {
    match input.event {
        Event::ButtonPress | Event::EncoderChange(_) => {
            app.state = TimerState::Setup;
            app.remaining_seconds = app.target_seconds;
            app.alarm_flash_on = false;
            if let Some(count) = input.value {
                app.last_encoder_baseline = count;
            }
            // Backlight is re-asserted: the buzzer shares LEDC with it.
            ActionSet::of(&[Action::UpdateUi, Action::AlarmStop, Action::BacklightOn])
        }
        Event::TickFast => {
            app.alarm_flash_on = !app.alarm_flash_on;
            ActionSet::of(&[Action::ToggleFlash])
        }
        Event::Tick1Hz | Event::InactivityTimeout => ActionSet::empty(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SLEEP state — display off
// ═══════════════════════════════════════════════════════════════════════════

fn sleep_event(app: &mut AppState, input: Input, _limits: &DurationLimits) -> ActionSet {
    match input.event {
        Event::ButtonPress | Event::EncoderChange(_) => {
            app.state = TimerState::Setup;
            if let Some(count) = input.value {
                app.last_encoder_baseline = count;
            }
            ActionSet::of(&[Action::UpdateUi, Action::BacklightOn])
        }
        Event::Tick1Hz | Event::TickFast | Event::InactivityTimeout => ActionSet::empty(),
    }
}
