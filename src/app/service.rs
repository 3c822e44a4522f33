//! Controller — the hexagonal core.
//!
//! [`Controller`] owns the [`AppState`], the inactivity tracker and the
//! two timer clocks, and turns each consumed [`Event`] into port calls.
//! All I/O flows through port traits, making the whole service testable
//! with mock adapters.
//!
//! ```text
//!  Event ──▶ ┌──────────────────────────┐ ──▶ ActuatorPort
//!            │        Controller         │ ──▶ PeriodicClock ×2
//!            │  FSM · dispatch · idle    │ ──▶ RenderSurface (locked)
//!            └──────────────────────────┘ ──▶ EventSink
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::activity::InactivityTracker;
use crate::config::TimerConfig;
use crate::events::Event;
use crate::fsm::{self, Action, ActionSet, AppState, DurationLimits, TimerState};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, PeriodicClock, RenderSurface};

/// Render surface shared between the controller and the display task.
pub type SharedSurface<S> = Arc<Mutex<S>>;

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<H, C, S> {
    app: AppState,
    limits: DurationLimits,
    config: TimerConfig,
    tracker: InactivityTracker,
    /// 1 Hz countdown clock.
    countdown: C,
    /// Alarm flash clock.
    flash: C,
    hw: H,
    surface: SharedSurface<S>,
}

impl<H, C, S> Controller<H, C, S>
where
    H: ActuatorPort,
    C: PeriodicClock,
    S: RenderSurface,
{
    /// Build the controller in Setup with the configured power-on target.
    ///
    /// Nothing is drawn or switched until [`start`](Self::start).
    pub fn new(
        config: TimerConfig,
        hw: H,
        countdown: C,
        flash: C,
        surface: SharedSurface<S>,
        now_ms: u64,
    ) -> Self {
        let app = AppState::new(config.initial_target());
        let tracker = InactivityTracker::new(config.inactivity_timeout_ms, now_ms);
        Self {
            app,
            limits: config.limits(),
            config,
            tracker,
            countdown,
            flash,
            hw,
            surface,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up the display and adopt the current encoder position.
    pub fn start(&mut self, encoder_count: i32, now_ms: u64, sink: &mut impl EventSink) {
        self.app.last_encoder_baseline = encoder_count;
        self.tracker.record_activity(now_ms);

        self.lock_surface().init();
        self.dispatch(ActionSet::of(&[Action::BacklightOn, Action::UpdateUi]));

        sink.emit(&AppEvent::Started {
            state: self.app.state,
            target_seconds: self.app.target_seconds,
        });
        info!(
            "Controller started in {} (target {}s, encoder {})",
            fsm::state_name(self.app.state),
            self.app.target_seconds,
            encoder_count
        );
    }

    // ── Event handling ────────────────────────────────────────

    /// Consume one event: activity bookkeeping, transition, dispatch.
    ///
    /// `sampled_count` is the encoder count the loop observed when it
    /// took the event off the channel.  Returns the dispatched actions.
    pub fn handle_event(
        &mut self,
        event: Event,
        sampled_count: Option<i32>,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> ActionSet {
        if event.is_user_input() {
            self.tracker.record_activity(now_ms);
        }

        let from = self.app.state;
        let actions = fsm::process_event(&mut self.app, event, sampled_count, &self.limits);
        self.dispatch(actions);

        let to = self.app.state;
        if to != from {
            sink.emit(&AppEvent::StateChanged { from, to });
            match (from, to) {
                (TimerState::Running, TimerState::Alarm) => sink.emit(&AppEvent::AlarmRaised {
                    target_seconds: self.app.target_seconds,
                }),
                (TimerState::Alarm, _) => sink.emit(&AppEvent::AlarmDismissed),
                _ => {}
            }
        }

        actions
    }

    /// Synthesise and process an inactivity timeout if one is due.
    ///
    /// Returns `true` when a timeout was processed.
    pub fn poll_inactivity(&mut self, now_ms: u64, sink: &mut impl EventSink) -> bool {
        match self.tracker.poll(self.app.state, now_ms) {
            Some(event) => {
                self.handle_event(event, None, now_ms, sink);
                true
            }
            None => false,
        }
    }

    /// Perform the side effects in `actions`, in fixed order.
    pub fn dispatch(&mut self, actions: ActionSet) {
        if actions.is_empty() {
            return;
        }
        debug!("dispatch {:?}", actions);

        for action in actions.iter() {
            match action {
                Action::BacklightOff => self.hw.backlight_off(),
                Action::StopTimer => self.countdown.stop(),
                Action::AlarmStop => {
                    self.hw.alarm_off();
                    self.flash.stop();
                    self.hw.backlight_on();
                }
                Action::StartTimer => self.countdown.start_periodic(self.config.countdown_period()),
                Action::AlarmStart => {
                    if self.config.audio_enabled {
                        self.hw.alarm_on();
                    }
                    self.flash.start_periodic(self.config.flash_period());
                }
                Action::BacklightOn => self.hw.backlight_on(),
                Action::UpdateUi => {
                    let (state, secs, progress) = (
                        self.app.state,
                        self.app.displayed_seconds(),
                        self.app.progress(),
                    );
                    self.lock_surface().update(state, secs, progress);
                }
                Action::ToggleFlash => {
                    let on = self.app.alarm_flash_on;
                    self.lock_surface().set_flash(on);
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.app.state
    }

    /// Snapshot of the application record.
    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn countdown_clock(&self) -> &C {
        &self.countdown
    }

    pub fn flash_clock(&self) -> &C {
        &self.flash
    }

    pub fn surface(&self) -> &SharedSurface<S> {
        &self.surface
    }

    // ── Internal ──────────────────────────────────────────────

    /// A poisoned lock only means another holder panicked mid-draw; the
    /// next full redraw repaints everything, so carry on.
    fn lock_surface(&self) -> MutexGuard<'_, S> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
