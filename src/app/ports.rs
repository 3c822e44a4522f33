//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (display, clocks, encoder, backlight, buzzer, event
//! sinks) implement these traits.  The
//! [`Controller`](super::service::Controller) consumes them via generics,
//! so the domain core never touches hardware directly.
//!
//! All ports are infallible from the core's point of view: collaborators
//! are initialised (and their failures handled) at startup, before the
//! control loop runs.

use core::time::Duration;

use crate::fsm::TimerState;

// ───────────────────────────────────────────────────────────────
// Render surface (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// The display.  Shared with the display flush task, so callers hold the
/// surface lock for the duration of each call.
pub trait RenderSurface {
    /// Build the screen.  Called once before the first update.
    fn init(&mut self);

    /// Full redraw: state colours, time label, arc percentage.
    fn update(&mut self, state: TimerState, displayed_seconds: u32, progress_percent: u8);

    /// Swap the alarm flash colours without a full redraw.
    fn set_flash(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Periodic clock (driven adapter: domain → timer service)
// ───────────────────────────────────────────────────────────────

/// A restartable timer whose expiry is delivered as an event on the
/// channel.  Two independent instances exist: the 1 Hz countdown clock
/// and the fast alarm-flash clock.
pub trait PeriodicClock {
    /// Fire every `period` until stopped.  Restarts a running clock.
    fn start_periodic(&mut self, period: Duration);

    /// Fire once after `delay`.  Restarts a running clock.
    fn start_once(&mut self, delay: Duration);

    /// Stop the clock.  Stopping an idle clock succeeds silently.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Encoder source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Polled accessor for the absolute pulse-counter value.
pub trait EncoderPort {
    fn count(&mut self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Simple on/off outputs: display backlight and alarm audio.
pub trait ActuatorPort {
    fn backlight_on(&mut self);

    fn backlight_off(&mut self);

    /// Start the alarm tone.  A board without a buzzer treats this as a no-op.
    fn alarm_on(&mut self);

    fn alarm_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait TimePort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
