//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                state,
                target_seconds,
            } => {
                info!("START | state={:?} | target={}s", state, target_seconds);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlarmRaised { target_seconds } => {
                info!("ALARM | brew of {}s complete", target_seconds);
            }
            AppEvent::AlarmDismissed => {
                info!("ALARM | dismissed");
            }
        }
    }
}
