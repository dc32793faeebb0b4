//! Mock hardware adapters for integration tests.
//!
//! Every mock records its calls so tests can assert on the full command
//! history.  All mocks can share one [`Trace`] to check cross-port
//! ordering inside a single dispatch cycle.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use songbird::app::dispatcher::{Ports, TickDispatcher};
use songbird::app::ports::{
    AudioEngine, ButtonPort, Clock, DiagnosticsSink, Display, IndicatorPort, SampleRate,
};
use songbird::config::SystemConfig;
use songbird::control::brightness::Indicator;
use songbird::control::smoothing::{LevelChannelId, LevelSnapshot};
use songbird::drivers::button::Button;
use songbird::error::{InitError, Subsystem, WriteError};
use songbird::fsm::StateId;

// ── Shared call trace ─────────────────────────────────────────

/// Ordered log of notable port calls across all mocks.
pub type Trace = Rc<RefCell<Vec<String>>>;

fn record(trace: &Trace, entry: impl Into<String>) {
    trace.borrow_mut().push(entry.into());
}

// ── MockAudio ─────────────────────────────────────────────────

pub struct MockAudio {
    pub levels: [f32; LevelChannelId::COUNT],
    pub connected: bool,
    pub ready: bool,
    pub sample_rate: SampleRate,
    pub init_result: Result<(), InitError>,
    /// Every `set_output_muted` argument, in order.
    pub mute_calls: Vec<bool>,
    /// Full passes over the four channels.
    pub level_passes: u32,
    trace: Trace,
}

impl MockAudio {
    pub fn new(trace: Trace) -> Self {
        Self {
            levels: [0.0; LevelChannelId::COUNT],
            connected: true,
            ready: true,
            sample_rate: SampleRate::Hz48k,
            init_result: Ok(()),
            mute_calls: Vec::new(),
            level_passes: 0,
            trace,
        }
    }

    pub fn set_all_levels(&mut self, level: f32) {
        self.levels = [level; LevelChannelId::COUNT];
    }
}

impl AudioEngine for MockAudio {
    fn init(&mut self) -> Result<(), InitError> {
        self.init_result
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn level(&mut self, channel: LevelChannelId) -> f32 {
        if channel == LevelChannelId::InputLeft {
            self.level_passes += 1;
            record(&self.trace, "level");
        }
        self.levels[channel as usize]
    }

    fn set_output_muted(&mut self, muted: bool) {
        self.mute_calls.push(muted);
        record(&self.trace, format!("mute:{muted}"));
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Render { state: StateId, input: f32, output: f32 },
    Message(String),
    Error(String),
}

pub struct MockDisplay {
    pub calls: Vec<DisplayCall>,
    pub ready: bool,
    pub init_result: Result<(), InitError>,
    trace: Trace,
}

impl MockDisplay {
    pub fn new(trace: Trace) -> Self {
        Self {
            calls: Vec::new(),
            ready: true,
            init_result: Ok(()),
            trace,
        }
    }

    pub fn errors(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DisplayCall::Error(_)))
            .count()
    }

    pub fn renders(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DisplayCall::Render { .. }))
            .count()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::Message(m) => Some(m.as_str()),
            _ => None,
        })
    }
}

impl Display for MockDisplay {
    fn init(&mut self) -> Result<(), InitError> {
        self.init_result
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn render(&mut self, state: StateId, levels: &LevelSnapshot) {
        self.calls.push(DisplayCall::Render {
            state,
            input: levels.input,
            output: levels.output,
        });
        record(&self.trace, "render");
    }

    fn render_message(&mut self, text: &str) {
        self.calls.push(DisplayCall::Message(text.to_owned()));
        record(&self.trace, "message");
    }

    fn render_error(&mut self, text: &str) {
        self.calls.push(DisplayCall::Error(text.to_owned()));
        record(&self.trace, "error");
    }
}

// ── MockButtons ───────────────────────────────────────────────

pub struct MockButtons {
    pub pressed: [bool; Button::COUNT],
    /// Pins that fail to read.
    pub unreadable: [bool; Button::COUNT],
    pub scans: u32,
    trace: Trace,
}

impl MockButtons {
    pub fn new(trace: Trace) -> Self {
        Self {
            pressed: [false; Button::COUNT],
            unreadable: [false; Button::COUNT],
            scans: 0,
            trace,
        }
    }

    pub fn press(&mut self, button: Button) {
        self.pressed[button as usize] = true;
    }

    pub fn release(&mut self, button: Button) {
        self.pressed[button as usize] = false;
    }
}

impl ButtonPort for MockButtons {
    fn is_pressed(&mut self, button: Button) -> Option<bool> {
        if button == Button::Up {
            self.scans += 1;
            record(&self.trace, "scan");
        }
        if self.unreadable[button as usize] {
            None
        } else {
            Some(self.pressed[button as usize])
        }
    }
}

// ── MockIndicators ────────────────────────────────────────────

pub struct MockIndicators {
    pub writes: Vec<(Indicator, u8)>,
    pub ready: bool,
    pub init_result: Result<(), InitError>,
    /// Number of upcoming writes to reject.
    pub fail_writes: u32,
    trace: Trace,
}

impl MockIndicators {
    pub fn new(trace: Trace) -> Self {
        Self {
            writes: Vec::new(),
            ready: true,
            fail_writes: 0,
            init_result: Ok(()),
            trace,
        }
    }

    /// Most recent duty written to `indicator`.
    pub fn last(&self, indicator: Indicator) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(i, _)| *i == indicator)
            .map(|(_, d)| *d)
    }
}

impl IndicatorPort for MockIndicators {
    fn init(&mut self) -> Result<(), InitError> {
        self.init_result
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_duty(&mut self, indicator: Indicator, duty: u8) -> Result<(), WriteError> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(WriteError::new(Subsystem::Indicators, "injected"));
        }
        self.writes.push((indicator, duty));
        if indicator == Indicator::Led1 {
            record(&self.trace, "led");
        }
        Ok(())
    }
}

// ── MockSink ──────────────────────────────────────────────────

pub struct MockSink {
    pub reports: Vec<String>,
    trace: Trace,
}

impl MockSink {
    pub fn new(trace: Trace) -> Self {
        Self {
            reports: Vec::new(),
            trace,
        }
    }
}

impl DiagnosticsSink for MockSink {
    fn report(&mut self, text: &str) {
        self.reports.push(text.to_owned());
        record(&self.trace, "diag");
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Test clock advanced by hand.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn at(now_ms: u32) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── Dispatcher harness ────────────────────────────────────────

pub type TestDispatcher =
    TickDispatcher<MockAudio, MockDisplay, MockButtons, MockIndicators, MockSink>;

/// A dispatcher over fresh mocks sharing one trace.  Not yet started.
pub fn make_dispatcher(config: SystemConfig) -> (TestDispatcher, Trace) {
    let trace: Trace = Rc::default();
    let ports = Ports {
        audio: MockAudio::new(Rc::clone(&trace)),
        display: MockDisplay::new(Rc::clone(&trace)),
        buttons: MockButtons::new(Rc::clone(&trace)),
        indicators: MockIndicators::new(Rc::clone(&trace)),
        diagnostics: MockSink::new(Rc::clone(&trace)),
    };
    let dispatcher = TickDispatcher::new(config, ports).expect("valid config");
    (dispatcher, trace)
}

/// Poll once per millisecond over `from..=to`.
pub fn run(d: &mut TestDispatcher, from: u32, to: u32) {
    for t in from..=to {
        d.poll(t);
    }
}
