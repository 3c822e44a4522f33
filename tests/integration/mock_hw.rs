//! Mock adapters for integration tests.
//!
//! Every collaborator call lands in one shared, ordered [`CallLog`] so
//! tests can assert on the exact sequence the dispatcher produced across
//! actuators, clocks and the render surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use teatimer::app::events::AppEvent;
use teatimer::app::ports::{
    ActuatorPort, EncoderPort, EventSink, PeriodicClock, RenderSurface, TimePort,
};
use teatimer::app::service::Controller;
use teatimer::config::TimerConfig;
use teatimer::fsm::TimerState;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockId {
    Countdown,
    Flash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    BacklightOn,
    BacklightOff,
    AlarmOn,
    AlarmOff,
    StartPeriodic(ClockId, Duration),
    StartOnce(ClockId, Duration),
    Stop(ClockId),
    SurfaceInit,
    Update {
        state: TimerState,
        secs: u32,
        progress: u8,
    },
    Flash(bool),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    log: CallLog,
    pub backlight: bool,
    pub alarm: bool,
}

impl MockHardware {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            backlight: false,
            alarm: false,
        }
    }
}

impl ActuatorPort for MockHardware {
    fn backlight_on(&mut self) {
        self.backlight = true;
        self.log.borrow_mut().push(Call::BacklightOn);
    }

    fn backlight_off(&mut self) {
        self.backlight = false;
        self.log.borrow_mut().push(Call::BacklightOff);
    }

    fn alarm_on(&mut self) {
        self.alarm = true;
        self.log.borrow_mut().push(Call::AlarmOn);
    }

    fn alarm_off(&mut self) {
        self.alarm = false;
        self.log.borrow_mut().push(Call::AlarmOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    id: ClockId,
    log: CallLog,
    running: bool,
}

impl MockClock {
    pub fn new(id: ClockId, log: CallLog) -> Self {
        Self {
            id,
            log,
            running: false,
        }
    }
}

impl PeriodicClock for MockClock {
    fn start_periodic(&mut self, period: Duration) {
        self.running = true;
        self.log.borrow_mut().push(Call::StartPeriodic(self.id, period));
    }

    fn start_once(&mut self, delay: Duration) {
        self.running = true;
        self.log.borrow_mut().push(Call::StartOnce(self.id, delay));
    }

    fn stop(&mut self) {
        self.running = false;
        self.log.borrow_mut().push(Call::Stop(self.id));
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

// ── MockSurface ───────────────────────────────────────────────

pub struct MockSurface {
    log: CallLog,
}

impl MockSurface {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl RenderSurface for MockSurface {
    fn init(&mut self) {
        self.log.borrow_mut().push(Call::SurfaceInit);
    }

    fn update(&mut self, state: TimerState, secs: u32, progress: u8) {
        self.log.borrow_mut().push(Call::Update {
            state,
            secs,
            progress,
        });
    }

    fn set_flash(&mut self, on: bool) {
        self.log.borrow_mut().push(Call::Flash(on));
    }
}

// ── Encoder + time ────────────────────────────────────────────

#[derive(Default)]
pub struct MockEncoder {
    pub count: i32,
}

impl EncoderPort for MockEncoder {
    fn count(&mut self) -> i32 {
        self.count
    }
}

#[derive(Default)]
pub struct MockTime {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockTime {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl TimePort for MockTime {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub type MockController = Controller<MockHardware, MockClock, MockSurface>;

/// A controller wired to mocks that all share `log`.
pub fn controller(config: TimerConfig) -> (MockController, CallLog) {
    let log = new_log();
    let surface = Arc::new(Mutex::new(MockSurface::new(Rc::clone(&log))));
    let c = Controller::new(
        config,
        MockHardware::new(Rc::clone(&log)),
        MockClock::new(ClockId::Countdown, Rc::clone(&log)),
        MockClock::new(ClockId::Flash, Rc::clone(&log)),
        surface,
        0,
    );
    (c, log)
}

/// Take everything recorded so far.
pub fn drain(log: &CallLog) -> Vec<Call> {
    std::mem::take(&mut *log.borrow_mut())
}
