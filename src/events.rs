//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISR (button press edge)
//! - esp_timer callbacks (1 Hz countdown tick, fast alarm-flash tick)
//! - The control loop itself (polled encoder changes)
//!
//! Events are consumed by the control loop, one at a time, in strict
//! FIFO order.  There is no priority and no coalescing.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISR  │────▶│              │     │              │
//! │ 1 Hz timer  │────▶│ Event Channel│────▶│ Control Loop │
//! │ Flash timer │────▶│  (10 slots)  │     │  (consumer)  │
//! │ Enc. poller │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Producers never block.  A push onto a full channel is dropped
//! silently; the next loop iteration re-observes the same hardware
//! condition and tries again.
//!
//! The consumer never parks on the channel.  It polls with `try_recv`
//! and sleeps between polls, so no waker is ever registered and a push
//! from interrupt context is a plain critical-section copy: no task
//! wake-up, no mutex, no logging.

use core::time::Duration;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::EVENT_CHANNEL_CAPACITY;

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One physical press edge on the dial button.
    ButtonPress,
    /// Encoder moved; carries the new absolute PCNT count, never a delta.
    EncoderChange(i32),
    /// Countdown clock fired.
    Tick1Hz,
    /// Alarm flash clock fired.
    TickFast,
    /// No user input for the configured idle period while in Setup.
    InactivityTimeout,
}

impl Event {
    /// Whether consuming this event counts as user activity.
    pub fn is_user_input(self) -> bool {
        matches!(self, Self::ButtonPress | Self::EncoderChange(_))
    }

    /// The encoder count carried by the event, if any.
    pub fn encoder_count(self) -> Option<i32> {
        match self {
            Self::EncoderChange(count) => Some(count),
            _ => None,
        }
    }
}

// ── Bounded MPSC channel ──────────────────────────────────────

/// Bounded FIFO between non-blocking producers and the control loop.
pub struct EventChannel {
    inner: Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_CAPACITY>,
}

impl EventChannel {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue without waiting.
    /// Safe to call from ISR / timer-task context.
    /// Returns `false` if the channel is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        self.inner.try_send(event).is_ok()
    }

    /// Dequeue the next event if one is already waiting.
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_receive().ok()
    }

    /// Wait at most `timeout` for the next event.
    ///
    /// Polls in [`RECV_POLL_SLICE`] steps; an event pushed mid-wait is
    /// picked up at the next slice boundary.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Event> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(event) = self.try_recv() {
                return Some(event);
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return None;
            }
            std::thread::sleep(left.min(RECV_POLL_SLICE));
        }
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Discard every pending event.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest single sleep inside [`EventChannel::recv_timeout`].
/// One FreeRTOS tick at the default 100 Hz.
pub const RECV_POLL_SLICE: Duration = Duration::from_millis(10);

/// Process-wide channel shared with ISR and timer-callback producers.
pub static EVENTS: EventChannel = EventChannel::new();

/// Push an event onto the process-wide channel.
/// Safe to call from ISR context.  Returns `false` if the event was dropped.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

// ── Encoder poller ────────────────────────────────────────────

/// Result of one encoder poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderPoll {
    /// Count matches the last observed value.
    Unchanged,
    /// A change was enqueued as `EncoderChange(count)`.
    Queued(i32),
    /// A change was seen but the channel was full.
    Dropped(i32),
}

/// Turns the polled absolute PCNT count into `EncoderChange` events.
///
/// Tracks the last *observed* count, which is distinct from the
/// state machine's *consumed* baseline.  The observed value only
/// advances once an event for it is actually queued, so a change that
/// hits a full channel is re-sent on the next poll.
#[derive(Debug, Clone, Default)]
pub struct EncoderPoller {
    last_observed: i32,
}

impl EncoderPoller {
    pub fn new(initial_count: i32) -> Self {
        Self {
            last_observed: initial_count,
        }
    }

    /// Compare `count` with the last observed value and enqueue on change.
    pub fn poll(&mut self, count: i32, channel: &EventChannel) -> EncoderPoll {
        if count == self.last_observed {
            return EncoderPoll::Unchanged;
        }
        if channel.push(Event::EncoderChange(count)) {
            self.last_observed = count;
            EncoderPoll::Queued(count)
        } else {
            EncoderPoll::Dropped(count)
        }
    }

    /// Last count successfully handed to the channel.
    pub fn last_observed(&self) -> i32 {
        self.last_observed
    }
}
