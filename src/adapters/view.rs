//! Frame model for the round dial display.
//!
//! [`FrameRenderer`] implements [`RenderSurface`] by computing the
//! [`Frame`] the screen should show: status text, `M:SS` time label, arc
//! colour and fill, background and text colours.  Pixel output belongs to
//! the display flush task, which reads [`FrameRenderer::frame`] under the
//! same lock the controller writes it with.

use core::fmt::Write;

use heapless::String;
use log::debug;

use crate::app::ports::RenderSurface;
use crate::fsm::TimerState;

// ── Palette (0xRRGGBB) ────────────────────────────────────────

pub const COLOR_SETUP: u32 = 0x2196F3;
pub const COLOR_RUNNING: u32 = 0x4CAF50;
pub const COLOR_ALARM: u32 = 0xF44336;
pub const COLOR_BG: u32 = 0x000000;
pub const COLOR_TEXT: u32 = 0xFFFFFF;

/// Fits the longest label, "99999:59".
pub type TimeLabel = String<10>;

/// Render `secs` as `M:SS`.  Minutes are not zero-padded.
pub fn format_time(secs: u32) -> TimeLabel {
    let mut label = TimeLabel::new();
    let minutes = (secs / 60).min(99_999);
    let _ = write!(label, "{}:{:02}", minutes, secs % 60);
    label
}

/// Everything the screen shows for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub state: TimerState,
    pub status: &'static str,
    pub time: TimeLabel,
    pub arc_color: u32,
    /// Arc fill, 0 – 100.
    pub arc_value: u8,
    pub background: u32,
    pub text_color: u32,
}

impl Frame {
    /// Frame for a full redraw.  Sleep has no frame: the backlight is off.
    pub fn compose(state: TimerState, displayed_seconds: u32, progress: u8) -> Option<Self> {
        let (status, arc_color) = match state {
            TimerState::Setup => ("BREW TIME", COLOR_SETUP),
            TimerState::Running => ("BREWING", COLOR_RUNNING),
            TimerState::Alarm => ("TEA IS READY!", COLOR_ALARM),
            TimerState::Sleep => return None,
        };
        Some(Self {
            state,
            status,
            time: format_time(displayed_seconds),
            arc_color,
            arc_value: progress.min(100),
            background: COLOR_BG,
            text_color: COLOR_TEXT,
        })
    }

    /// Apply the alarm flash phase: inverted red/black when on.
    pub fn set_flash(&mut self, on: bool) {
        if on {
            self.background = COLOR_ALARM;
            self.text_color = COLOR_BG;
        } else {
            self.background = COLOR_BG;
            self.text_color = COLOR_TEXT;
        }
    }
}

/// The render surface the firmware ships with.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    initialized: bool,
    frame: Option<Frame>,
    redraws: u32,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame, `None` before the first draw.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Full redraws since boot.
    pub fn redraws(&self) -> u32 {
        self.redraws
    }
}

impl RenderSurface for FrameRenderer {
    fn init(&mut self) {
        self.initialized = true;
        self.frame = Frame::compose(TimerState::Setup, 0, 100);
        log::info!("view: initialised");
    }

    fn update(&mut self, state: TimerState, displayed_seconds: u32, progress_percent: u8) {
        let Some(frame) = Frame::compose(state, displayed_seconds, progress_percent) else {
            // Keep the last frame so waking shows something sane.
            return;
        };
        debug!(
            "view: {} {} arc={}% #{:06X}",
            frame.status, frame.time, frame.arc_value, frame.arc_color
        );
        self.frame = Some(frame);
        self.redraws = self.redraws.wrapping_add(1);
    }

    fn set_flash(&mut self, on: bool) {
        if let Some(frame) = self.frame.as_mut() {
            frame.set_flash(on);
        }
    }
}
