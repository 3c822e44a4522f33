//! Tea Timer Firmware — Main Entry Point
//!
//! Hexagonal architecture with one event-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   FrameRenderer   Esp32Time    │
//! │  (ActuatorPort)    (EventSink)    (RenderSurface) (TimePort)   │
//! │  PcntEncoder       EspClock ×2    button ISR                   │
//! │  (EncoderPort)     (PeriodicClock)(EVENTS producer)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         ControlLoop → Controller (pure logic)          │    │
//! │  │         FSM · dispatch · inactivity                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use teatimer::adapters::hardware::HardwareAdapter;
use teatimer::adapters::log_sink::LogEventSink;
use teatimer::adapters::time::Esp32TimeAdapter;
use teatimer::adapters::view::FrameRenderer;
use teatimer::app::control_loop::ControlLoop;
use teatimer::app::ports::TimePort;
use teatimer::app::service::Controller;
use teatimer::config::TimerConfig;
use teatimer::drivers::backlight::Backlight;
use teatimer::drivers::button;
use teatimer::drivers::buzzer::Buzzer;
use teatimer::drivers::encoder::PcntEncoder;
use teatimer::drivers::hw_init;
use teatimer::drivers::hw_timer::{ClockKind, EspClock};
use teatimer::error::Error;
use teatimer::events::EVENTS;
use teatimer::pins;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TeaTimer v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = TimerConfig::default();
    config.validate().map_err(Error::from)?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let backlight = Backlight::new(PinDriver::output(peripherals.pins.gpio9)?);

    hw_init::init_isr_service().map_err(Error::from)?;
    button::init_button(pins::BUTTON_GPIO).map_err(Error::from)?;

    let encoder =
        PcntEncoder::new(pins::ENCODER_A_GPIO, pins::ENCODER_B_GPIO).map_err(Error::from)?;

    let buzzer = match Buzzer::new(pins::BUZZER_GPIO) {
        Ok(b) => Some(b),
        Err(e) => {
            warn!("Buzzer unavailable ({}), alarm will be visual only", e);
            None
        }
    };

    let countdown = EspClock::new(ClockKind::Countdown).map_err(Error::from)?;
    let flash = EspClock::new(ClockKind::Flash).map_err(Error::from)?;

    // ── 4. Construct adapters + core ──────────────────────────
    let hw = HardwareAdapter::new(backlight, buzzer);
    let surface = Arc::new(Mutex::new(FrameRenderer::new()));
    let time = Esp32TimeAdapter::new();
    let controller = Controller::new(config, hw, countdown, flash, surface, time.now_ms());
    let mut log_sink = LogEventSink::new();

    // ── 5. Run ────────────────────────────────────────────────
    let mut control = ControlLoop::new(controller, encoder, time, &EVENTS);
    control.run(&mut log_sink)
}
