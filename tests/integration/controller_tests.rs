//! Integration tests for the Controller → FSM → ports pipeline.
//!
//! These run on the host (x86_64) and verify the exact collaborator calls
//! produced for each event, without any real hardware.

use std::time::Duration;

use teatimer::app::events::AppEvent;
use teatimer::app::ports::PeriodicClock;
use teatimer::config::TimerConfig;
use teatimer::events::Event;
use teatimer::fsm::{Action, ActionSet, TimerState};

use super::mock_hw::{controller, drain, Call, ClockId, RecordingSink};

const ONE_SEC: Duration = Duration::from_secs(1);
const FLASH: Duration = Duration::from_millis(500);

#[test]
fn start_initialises_then_lights_and_draws() {
    let (mut c, log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(17, 0, &mut sink);

    assert_eq!(
        drain(&log),
        vec![
            Call::SurfaceInit,
            Call::BacklightOn,
            Call::Update {
                state: TimerState::Setup,
                secs: 300,
                progress: 100
            },
        ]
    );
    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            state: TimerState::Setup,
            target_seconds: 300
        }]
    );
    assert_eq!(c.app().last_encoder_baseline, 17);
}

#[test]
fn dispatch_runs_in_fixed_order() {
    let (mut c, log) = controller(TimerConfig::default());
    let all: ActionSet = Action::ALL.into_iter().collect();
    c.dispatch(all);

    let state = c.state();
    assert_eq!(
        drain(&log),
        vec![
            Call::BacklightOff,
            Call::Stop(ClockId::Countdown),
            Call::AlarmOff,
            Call::Stop(ClockId::Flash),
            Call::BacklightOn,
            Call::StartPeriodic(ClockId::Countdown, ONE_SEC),
            Call::AlarmOn,
            Call::StartPeriodic(ClockId::Flash, FLASH),
            Call::BacklightOn,
            Call::Update {
                state,
                secs: 300,
                progress: 100
            },
            Call::Flash(false),
        ]
    );
}

#[test]
fn stop_timer_twice_leaves_clock_as_once() {
    let (mut once, _) = controller(TimerConfig::default());
    let (mut twice, _) = controller(TimerConfig::default());
    for c in [&mut once, &mut twice] {
        c.dispatch(ActionSet::of(&[Action::StartTimer]));
    }

    once.dispatch(ActionSet::of(&[Action::StopTimer]));
    twice.dispatch(ActionSet::of(&[Action::StopTimer]));
    twice.dispatch(ActionSet::of(&[Action::StopTimer]));

    assert!(!once.countdown_clock().is_running());
    assert_eq!(
        once.countdown_clock().is_running(),
        twice.countdown_clock().is_running()
    );
}

#[test]
fn full_brew_cycle() {
    let (mut c, log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);

    // Four detents anticlockwise: 300 → 60 s.
    c.handle_event(Event::EncoderChange(-16), None, 100, &mut sink);
    assert_eq!(c.app().target_seconds, 60);

    c.handle_event(Event::ButtonPress, Some(-16), 200, &mut sink);
    assert_eq!(c.state(), TimerState::Running);
    drain(&log);

    for _ in 0..59 {
        c.handle_event(Event::Tick1Hz, Some(-16), 300, &mut sink);
    }
    assert_eq!(c.app().remaining_seconds, 1);
    drain(&log);

    c.handle_event(Event::Tick1Hz, Some(-16), 400, &mut sink);
    assert_eq!(c.state(), TimerState::Alarm);
    assert_eq!(
        drain(&log),
        vec![
            Call::Stop(ClockId::Countdown),
            Call::AlarmOn,
            Call::StartPeriodic(ClockId::Flash, FLASH),
            Call::Update {
                state: TimerState::Alarm,
                secs: 0,
                progress: 0
            },
        ]
    );

    // Late tick after the alarm fired is ignored.
    c.handle_event(Event::Tick1Hz, Some(-16), 450, &mut sink);
    assert!(drain(&log).is_empty());

    c.handle_event(Event::TickFast, Some(-16), 500, &mut sink);
    assert_eq!(drain(&log), vec![Call::Flash(false)]);
    c.handle_event(Event::TickFast, Some(-16), 1000, &mut sink);
    assert_eq!(drain(&log), vec![Call::Flash(true)]);

    c.handle_event(Event::ButtonPress, Some(-16), 1200, &mut sink);
    assert_eq!(c.state(), TimerState::Setup);
    assert_eq!(c.app().remaining_seconds, 60);
    assert!(!c.app().alarm_flash_on);
    assert_eq!(
        drain(&log),
        vec![
            Call::AlarmOff,
            Call::Stop(ClockId::Flash),
            Call::BacklightOn,
            Call::BacklightOn,
            Call::Update {
                state: TimerState::Setup,
                secs: 60,
                progress: 100
            },
        ]
    );

    let alarms: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::AlarmRaised { .. }))
        .collect();
    assert_eq!(alarms, vec![&AppEvent::AlarmRaised { target_seconds: 60 }]);
    assert!(sink.events.contains(&AppEvent::AlarmDismissed));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::AlarmDismissed),
        "dismissal follows the state change"
    );
}

#[test]
fn cancel_stops_countdown_and_restores_target() {
    let (mut c, log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);
    c.handle_event(Event::ButtonPress, Some(0), 0, &mut sink);
    for _ in 0..10 {
        c.handle_event(Event::Tick1Hz, Some(0), 0, &mut sink);
    }
    drain(&log);

    c.handle_event(Event::ButtonPress, Some(0), 0, &mut sink);
    assert_eq!(c.state(), TimerState::Setup);
    assert_eq!(c.app().remaining_seconds, 300);
    assert_eq!(
        drain(&log),
        vec![
            Call::Stop(ClockId::Countdown),
            Call::Update {
                state: TimerState::Setup,
                secs: 300,
                progress: 100
            },
        ]
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::StateChanged {
            from: TimerState::Running,
            to: TimerState::Setup
        })
    );
}

#[test]
fn alarm_dismissal_adopts_sampled_count() {
    let (mut c, _log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);
    c.handle_event(Event::ButtonPress, Some(0), 0, &mut sink);
    for _ in 0..300 {
        c.handle_event(Event::Tick1Hz, Some(0), 0, &mut sink);
    }
    assert_eq!(c.state(), TimerState::Alarm);

    let actions = c.handle_event(Event::ButtonPress, Some(123), 0, &mut sink);
    assert_eq!(
        actions,
        ActionSet::of(&[Action::UpdateUi, Action::AlarmStop, Action::BacklightOn])
    );
    assert_eq!(c.app().last_encoder_baseline, 123);
    assert_eq!(c.app().target_seconds, 300);
}

#[test]
fn inactivity_sleeps_and_input_wakes() {
    let (mut c, log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);
    drain(&log);

    assert!(!c.poll_inactivity(59_999, &mut sink));
    assert!(c.poll_inactivity(60_000, &mut sink));
    assert_eq!(c.state(), TimerState::Sleep);
    // Backlight goes dark before the Sleep redraw request.
    assert_eq!(
        drain(&log),
        vec![
            Call::BacklightOff,
            Call::Update {
                state: TimerState::Sleep,
                secs: 300,
                progress: 0
            },
        ]
    );

    c.handle_event(Event::EncoderChange(40), None, 70_000, &mut sink);
    assert_eq!(c.state(), TimerState::Setup);
    assert_eq!(c.app().target_seconds, 300, "waking does not adjust");
    assert_eq!(c.app().last_encoder_baseline, 40);
    assert_eq!(
        drain(&log),
        vec![
            Call::BacklightOn,
            Call::Update {
                state: TimerState::Setup,
                secs: 300,
                progress: 100
            },
        ]
    );

    // Activity at 70 s restarts the idle period.
    assert!(!c.poll_inactivity(129_999, &mut sink));
    assert!(c.poll_inactivity(130_000, &mut sink));
}

#[test]
fn muted_alarm_is_visual_only() {
    let config = TimerConfig {
        audio_enabled: false,
        ..TimerConfig::default()
    };
    let (mut c, log) = controller(config);
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);
    c.handle_event(Event::ButtonPress, Some(0), 0, &mut sink);
    for _ in 0..300 {
        c.handle_event(Event::Tick1Hz, Some(0), 0, &mut sink);
    }
    assert_eq!(c.state(), TimerState::Alarm);

    let calls = drain(&log);
    assert!(!calls.contains(&Call::AlarmOn));
    assert!(calls.contains(&Call::StartPeriodic(ClockId::Flash, FLASH)));
}

#[test]
fn sub_detent_turns_do_not_redraw() {
    let (mut c, log) = controller(TimerConfig::default());
    let mut sink = RecordingSink::default();
    c.start(0, 0, &mut sink);
    drain(&log);

    let actions = c.handle_event(Event::EncoderChange(3), None, 0, &mut sink);
    assert!(actions.is_empty());
    assert!(drain(&log).is_empty());
    assert_eq!(c.app().target_seconds, 300);
}
