//! Integration tests for the full control loop: encoder polling, the
//! bounded channel, inactivity synthesis and draining.

use teatimer::app::control_loop::ControlLoop;
use teatimer::app::events::AppEvent;
use teatimer::config::{TimerConfig, EVENT_CHANNEL_CAPACITY};
use teatimer::drivers::button::{press_edge, EdgeDebounce, DEBOUNCE_MS};
use teatimer::drivers::encoder::PcntEncoder;
use teatimer::events::{Event, EventChannel};
use teatimer::fsm::TimerState;

use super::mock_hw::{
    controller, drain, Call, MockClock, MockEncoder, MockHardware, MockSurface, MockTime,
    RecordingSink,
};

type Loop<'ch> = ControlLoop<'ch, MockHardware, MockClock, MockSurface, MockEncoder, MockTime>;

fn started(channel: &EventChannel, initial_count: i32) -> (Loop<'_>, RecordingSink) {
    let (c, _log) = controller(TimerConfig::default());
    let encoder = MockEncoder {
        count: initial_count,
    };
    let mut lp = ControlLoop::new(c, encoder, MockTime::default(), channel);
    let mut sink = RecordingSink::default();
    lp.start(&mut sink);
    (lp, sink)
}

#[test]
fn power_on_count_is_not_a_turn() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 37);

    assert_eq!(lp.run_once(&mut sink), 0);
    assert_eq!(lp.controller().app().target_seconds, 300);
    assert_eq!(lp.controller().app().last_encoder_baseline, 37);
    assert_eq!(lp.stats().iterations, 1);
}

#[test]
fn encoder_turn_is_processed_in_the_same_iteration() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    lp.encoder_mut().count = 4;
    assert_eq!(lp.run_once(&mut sink), 1);
    assert_eq!(lp.controller().app().target_seconds, 360);

    lp.encoder_mut().count = 7;
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().app().target_seconds, 360, "partial detent");

    lp.encoder_mut().count = 8;
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().app().target_seconds, 420);
    assert_eq!(lp.stats().events_processed, 3);
}

#[test]
fn queued_events_are_drained_in_order() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    assert!(channel.push(Event::ButtonPress));
    for _ in 0..3 {
        assert!(channel.push(Event::Tick1Hz));
    }

    assert_eq!(lp.run_once(&mut sink), 4);
    assert!(channel.is_empty());
    assert_eq!(lp.controller().state(), TimerState::Running);
    assert_eq!(lp.controller().app().remaining_seconds, 297);
}

#[test]
fn bouncy_press_starts_one_brew() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);
    let debounce = EdgeDebounce::new();

    // One press: the contact closes, bounces open and closes again.
    assert!(press_edge(&debounce, &channel, 2_000));
    assert!(!press_edge(&debounce, &channel, 2_002));
    assert!(!press_edge(&debounce, &channel, 2_007));

    assert_eq!(lp.run_once(&mut sink), 1);
    assert_eq!(lp.controller().state(), TimerState::Running);

    // A second, deliberate press cancels.
    assert!(press_edge(&debounce, &channel, 2_000 + DEBOUNCE_MS + 400));
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Setup);
}

#[test]
fn failed_encoder_read_is_not_a_turn() {
    let channel = EventChannel::new();
    let (c, _log) = controller(TimerConfig::default());
    let mut encoder = PcntEncoder::new(41, 40).unwrap();
    encoder.set_sim_count(400);
    let mut lp = ControlLoop::new(c, encoder, MockTime::default(), &channel);
    let mut sink = RecordingSink::default();
    lp.start(&mut sink);

    lp.encoder_mut().set_sim_fault(Some(-1));
    lp.encoder_mut().set_sim_count(0);
    assert_eq!(lp.run_once(&mut sink), 0);
    assert_eq!(lp.controller().app().target_seconds, 300);

    // Once reads recover, the real movement is a genuine turn.
    lp.encoder_mut().set_sim_fault(None);
    lp.encoder_mut().set_sim_count(404);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().app().target_seconds, 360);
}

#[test]
fn dropped_encoder_change_is_resent() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    // Ticks are no-ops in Setup; they only occupy the channel.
    for _ in 0..EVENT_CHANNEL_CAPACITY {
        assert!(channel.push(Event::Tick1Hz));
    }
    lp.encoder_mut().count = 8;

    assert_eq!(lp.run_once(&mut sink), EVENT_CHANNEL_CAPACITY);
    assert_eq!(lp.stats().encoder_drops, 1);
    assert_eq!(lp.controller().app().target_seconds, 300);

    assert_eq!(lp.run_once(&mut sink), 1);
    assert_eq!(lp.controller().app().target_seconds, 420);
}

#[test]
fn idle_setup_goes_to_sleep_once() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    lp.time_mut().advance(59_999);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Setup);

    lp.time_mut().advance(1);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Sleep);
    assert_eq!(lp.stats().inactivity_timeouts, 1);
    assert!(!lp.controller().hw().backlight);

    lp.time_mut().advance(120_000);
    lp.run_once(&mut sink);
    assert_eq!(lp.stats().inactivity_timeouts, 1, "sleep does not re-time-out");
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::StateChanged {
            from: TimerState::Setup,
            to: TimerState::Sleep
        })
    );
}

#[test]
fn turning_the_dial_keeps_the_display_awake() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    lp.time_mut().advance(50_000);
    lp.encoder_mut().count = 4;
    lp.run_once(&mut sink);

    lp.time_mut().advance(50_000);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Setup);

    lp.time_mut().advance(10_000);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Sleep);
}

#[test]
fn brewing_never_times_out() {
    let channel = EventChannel::new();
    let (mut lp, mut sink) = started(&channel, 0);

    assert!(channel.push(Event::ButtonPress));
    lp.run_once(&mut sink);
    lp.time_mut().advance(600_000);
    lp.run_once(&mut sink);
    assert_eq!(lp.controller().state(), TimerState::Running);
    assert_eq!(lp.stats().inactivity_timeouts, 0);
}

#[test]
fn start_draws_first_frame() {
    let channel = EventChannel::new();
    let (c, log) = controller(TimerConfig::default());
    let mut lp = ControlLoop::new(c, MockEncoder { count: 5 }, MockTime::default(), &channel);
    let mut sink = RecordingSink::default();
    lp.start(&mut sink);

    let calls = drain(&log);
    assert_eq!(calls.first(), Some(&Call::SurfaceInit));
    assert!(calls.contains(&Call::BacklightOn));
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started { .. }]));
}
