//! The single consumer task.
//!
//! Each iteration polls the encoder, checks for inactivity, then waits a
//! bounded time on the event channel and drains whatever is queued:
//!
//! ```text
//!  EncoderPort ─poll─▶ EventChannel ◀─try_send─ button ISR / esp_timer
//!                          │
//!                 recv_timeout + drain
//!                          ▼
//!                     Controller ──▶ ports
//! ```

use log::{info, trace};

use crate::events::{EncoderPoll, EncoderPoller, Event, EventChannel};

use super::ports::{ActuatorPort, EncoderPort, EventSink, PeriodicClock, RenderSurface, TimePort};
use super::service::Controller;

/// Counters kept by the control loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub events_processed: u64,
    /// Encoder changes that found the channel full (re-sent next poll).
    pub encoder_drops: u64,
    pub inactivity_timeouts: u64,
}

pub struct ControlLoop<'ch, H, C, S, E, T> {
    controller: Controller<H, C, S>,
    encoder: E,
    time: T,
    channel: &'ch EventChannel,
    poller: EncoderPoller,
    stats: LoopStats,
}

impl<'ch, H, C, S, E, T> ControlLoop<'ch, H, C, S, E, T>
where
    H: ActuatorPort,
    C: PeriodicClock,
    S: RenderSurface,
    E: EncoderPort,
    T: TimePort,
{
    pub fn new(controller: Controller<H, C, S>, encoder: E, time: T, channel: &'ch EventChannel) -> Self {
        Self {
            controller,
            encoder,
            time,
            channel,
            poller: EncoderPoller::default(),
            stats: LoopStats::default(),
        }
    }

    /// Draw the first frame and adopt the current dial position, so the
    /// first poll does not report the power-on count as a turn.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let count = self.encoder.count();
        self.poller = EncoderPoller::new(count);
        let now = self.time.now_ms();
        self.controller.start(count, now, sink);
    }

    /// One loop iteration.  Returns the number of channel events consumed.
    pub fn run_once(&mut self, sink: &mut impl EventSink) -> usize {
        self.stats.iterations += 1;

        let count = self.encoder.count();
        if let EncoderPoll::Dropped(c) = self.poller.poll(count, self.channel) {
            self.stats.encoder_drops += 1;
            trace!("encoder change to {} dropped, channel full", c);
        }

        let now = self.time.now_ms();
        if self.controller.poll_inactivity(now, sink) {
            self.stats.inactivity_timeouts += 1;
        }

        let Some(first) = self.channel.recv_timeout(self.controller.config().receive_timeout()) else {
            return 0;
        };

        self.process(first, sink);
        let mut consumed = 1;
        while let Some(event) = self.channel.try_recv() {
            self.process(event, sink);
            consumed += 1;
        }
        consumed
    }

    /// Start, then iterate forever.
    pub fn run(&mut self, sink: &mut impl EventSink) -> ! {
        self.start(sink);
        info!("control loop running");
        loop {
            self.run_once(sink);
        }
    }

    fn process(&mut self, event: Event, sink: &mut impl EventSink) {
        let now = self.time.now_ms();
        let sampled = Some(self.poller.last_observed());
        self.controller.handle_event(event, sampled, now, sink);
        self.stats.events_processed += 1;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn controller(&self) -> &Controller<H, C, S> {
        &self.controller
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    pub fn time_mut(&mut self) -> &mut T {
        &mut self.time
    }
}
