//! Tick dispatcher: the hexagonal core.
//!
//! [`TickDispatcher`] owns every piece of control state (debouncer, FSM,
//! smoothers, brightness mapper, health flags) plus the injected port
//! adapters.  It runs each job at its own cadence from one cooperative
//! loop; nothing blocks or sleeps.
//!
//! ```text
//!  ButtonPort ──▶ ┌──────────────────────────────┐ ──▶ IndicatorPort
//!                 │        TickDispatcher        │
//! AudioEngine ◀──▶│ Debounce · FSM · Smooth · Map│ ──▶ Display
//!                 └──────────────────────────────┘ ──▶ DiagnosticsSink
//! ```
//!
//! ## Order inside one main-dispatch firing
//!
//! 1. Button scan (if due): debounce, queue rising edges.
//! 2. State evaluation: drain queued edges through the FSM, applying each
//!    mute command to the audio engine before the next edge.
//! 3. Level + brightness update (if due).
//! 4. Display render (if due).
//! 5. Diagnostics report (if due).
//!
//! Sub-tasks are only considered inside a main-dispatch firing.  After a
//! latched init failure steps 1–5 are replaced by the error pattern and
//! periodic re-announcement.

use core::fmt::Write;

use heapless::Deque;
use log::{error, info, warn};

use crate::config::SystemConfig;
use crate::control::brightness::{BrightnessMapper, Indicator};
use crate::control::smoothing::{LevelSmoother, LevelSnapshot};
use crate::diagnostics::{DiagnosticsAggregator, DiagnosticsReport};
use crate::drivers::button::{Button, InputDebouncer};
use crate::drivers::led_patterns::{LedPatternEngine, PatternId};
use crate::error::{InitError, Subsystem};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{DISCONNECTED_MESSAGE, Fsm, StateId};
use crate::health::HealthMonitor;
use crate::scheduler::{Task, TaskSchedule};

use super::ports::{AudioEngine, ButtonPort, Clock, DiagnosticsSink, Display, IndicatorPort};

/// Pending edges between a scan and the next state evaluation.  A scan
/// yields at most one edge per button.
const EDGE_QUEUE_DEPTH: usize = 8;

// ───────────────────────────────────────────────────────────────
// Ports bundle
// ───────────────────────────────────────────────────────────────

/// The adapters the dispatcher drives.  Owned for the dispatcher's
/// lifetime; reachable through [`TickDispatcher::ports`].
pub struct Ports<A, D, B, L, S> {
    pub audio: A,
    pub display: D,
    pub buttons: B,
    pub indicators: L,
    pub diagnostics: S,
}

// ───────────────────────────────────────────────────────────────
// TickDispatcher
// ───────────────────────────────────────────────────────────────

/// Single-threaded cooperative scheduler for the whole control core.
pub struct TickDispatcher<A, D, B, L, S>
where
    A: AudioEngine,
    D: Display,
    B: ButtonPort,
    L: IndicatorPort,
    S: DiagnosticsSink,
{
    ports: Ports<A, D, B, L, S>,
    config: SystemConfig,
    schedule: TaskSchedule,
    debouncer: InputDebouncer,
    edges: Deque<Button, EDGE_QUEUE_DEPTH>,
    fsm: Fsm,
    ctx: FsmContext,
    smoother: LevelSmoother,
    brightness: BrightnessMapper,
    health: HealthMonitor,
    diagnostics: DiagnosticsAggregator,
    error_pattern: LedPatternEngine,
    /// Last mute command applied to the audio engine.
    output_muted: Option<bool>,
    started_at_ms: u32,
    cycles: u32,
    started: bool,
}

impl<A, D, B, L, S> TickDispatcher<A, D, B, L, S>
where
    A: AudioEngine,
    D: Display,
    B: ButtonPort,
    L: IndicatorPort,
    S: DiagnosticsSink,
{
    /// Validate `config` and assemble the dispatcher.
    ///
    /// Does **not** touch the ports; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, ports: Ports<A, D, B, L, S>) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            schedule: TaskSchedule::new(&config),
            debouncer: InputDebouncer::new(config.debounce_ms),
            edges: Deque::new(),
            fsm: Fsm::new(build_state_table(), StateId::Standby),
            ctx: FsmContext::new(),
            smoother: LevelSmoother::new(config.level_alpha),
            brightness: BrightnessMapper::from_config(&config),
            health: HealthMonitor::new(),
            diagnostics: DiagnosticsAggregator::new(),
            error_pattern: LedPatternEngine::new(config.error_blink_ms),
            output_muted: None,
            started_at_ms: 0,
            cycles: 0,
            started: false,
            ports,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise every collaborator and enter Standby.
    ///
    /// On any `init()` failure the first error is latched, the dispatcher
    /// switches to error mode for good and the error is returned.  Polling
    /// must continue afterwards so the error indication keeps running.
    pub fn start(&mut self, now_ms: u32) -> crate::error::Result<()> {
        self.schedule.reset(now_ms);
        self.started_at_ms = now_ms;
        self.started = true;

        // Indicators first so the error pattern has somewhere to go.
        if let Err(e) = self.ports.indicators.init() {
            self.health.latch_init_failure(e);
        }
        if let Err(e) = self.ports.audio.init() {
            self.health.latch_init_failure(e);
        }
        if let Err(e) = self.ports.display.init() {
            self.health.latch_init_failure(e);
        }

        if let Some(err) = self.health.init_failure() {
            self.enter_error_mode();
            return Err(err.into());
        }

        self.fsm.start(&mut self.ctx);
        self.apply_fsm_commands();
        self.ports
            .display
            .render_message(self.fsm.current_state().status_message());
        info!(
            "Dispatcher started: main={}ms scan={}ms led={}ms display={}ms diag={}ms",
            self.config.main_tick_ms,
            self.config.button_scan_ms,
            self.config.led_update_ms,
            self.config.display_update_ms,
            self.config.diagnostics_interval_ms
        );
        Ok(())
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run everything that is due at `now_ms`.
    ///
    /// Returns `true` when the main dispatch fired.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if !self.started || !self.schedule.fire_if_due(Task::MainDispatch, now_ms) {
            return false;
        }
        self.cycles = self.cycles.wrapping_add(1);

        if self.health.is_latched() {
            self.run_error_mode(now_ms);
            return true;
        }

        // 1. Input
        if self.schedule.fire_if_due(Task::ButtonScan, now_ms) {
            self.scan_buttons(now_ms);
        }

        // 2. State
        self.evaluate_state();

        // 3. Levels → LEDs
        if self.schedule.fire_if_due(Task::LevelUpdate, now_ms) {
            self.update_levels();
        }

        // 4. Display
        if self.schedule.fire_if_due(Task::DisplayRender, now_ms) {
            self.render_display();
        }

        // 5. Diagnostics
        if self.schedule.fire_if_due(Task::Diagnostics, now_ms) {
            let report = self.report(now_ms);
            self.diagnostics.emit(&report, &mut self.ports.diagnostics);
        }

        true
    }

    /// [`poll`](Self::poll) at the clock's current time.
    pub fn poll_clock(&mut self, clock: &impl Clock) -> bool {
        self.poll(clock.now_ms())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn previous_state(&self) -> StateId {
        self.fsm.previous_state()
    }

    /// Whether an init failure has latched error mode.
    pub fn is_error_mode(&self) -> bool {
        self.health.is_latched()
    }

    /// Main dispatch cycles run since start.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Last mute command sent to the audio engine (`None` before start).
    pub fn output_muted(&self) -> Option<bool> {
        self.output_muted
    }

    /// Current duty of one indicator as computed by the mapper.
    pub fn duty(&self, indicator: Indicator) -> u8 {
        self.brightness.current(indicator)
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn ports(&self) -> &Ports<A, D, B, L, S> {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports<A, D, B, L, S> {
        &mut self.ports
    }

    pub fn debouncer(&self) -> &InputDebouncer {
        &self.debouncer
    }

    pub fn smoother(&self) -> &LevelSmoother {
        &self.smoother
    }

    pub fn brightness(&self) -> &BrightnessMapper {
        &self.brightness
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    pub fn schedule(&self) -> &TaskSchedule {
        &self.schedule
    }

    /// Snapshot of the current levels as the display sees them.
    pub fn level_snapshot(&self) -> LevelSnapshot {
        self.smoother.snapshot(
            self.ports.audio.is_connected(),
            self.ports.audio.sample_rate(),
        )
    }

    /// Diagnostics snapshot as of `now_ms`.  Read-only.
    pub fn report(&self, now_ms: u32) -> DiagnosticsReport {
        let levels = self.level_snapshot();
        DiagnosticsReport {
            uptime_ms: now_ms.wrapping_sub(self.started_at_ms),
            cycles: self.cycles,
            state: self.fsm.current_state(),
            levels: levels.channels,
            duties: self.brightness.currents(),
            connected: levels.connected,
            sample_rate: levels.sample_rate,
            not_ready_mask: self.health.not_ready_mask(),
            sticky_mask: self.health.sticky_mask(),
            skipped_updates: self.health.skipped_updates(),
            transitions: self.fsm.transition_count(),
            edges: self.ctx.edges_handled,
            error_mode: self.health.is_latched(),
        }
    }

    // ── Internal: normal mode ─────────────────────────────────

    fn scan_buttons(&mut self, now_ms: u32) {
        let outcome = self.debouncer.scan(&mut self.ports.buttons, now_ms);
        self.health.observe(Subsystem::Buttons, !outcome.unreadable);
        for button in outcome.pressed {
            if self.edges.push_back(button).is_err() {
                warn!("Edge queue full, dropping {} press", button.name());
            }
        }
    }

    fn evaluate_state(&mut self) {
        while let Some(button) = self.edges.pop_front() {
            self.fsm.handle_edge(button, &mut self.ctx);
            self.apply_fsm_commands();
        }
    }

    fn apply_fsm_commands(&mut self) {
        if let Some(muted) = self.ctx.commands.take_mute() {
            self.ports.audio.set_output_muted(muted);
            self.output_muted = Some(muted);
        }
    }

    fn update_levels(&mut self) {
        let audio_ready = self
            .health
            .observe(Subsystem::Audio, self.ports.audio.is_ready());
        if audio_ready {
            self.smoother.update(|id| self.ports.audio.level(id));
        }

        self.brightness.set_targets(
            self.fsm.current_state(),
            self.smoother.input_level(),
            self.smoother.output_level(),
        );
        let duties = self.brightness.step();

        // A failed write flags the LEDs for this cycle only; the next
        // update writes again.
        let written = self.ports.indicators.is_ready() && self.write_duties(duties);
        self.health.observe(Subsystem::Indicators, written);
    }

    /// Write both duties, attempting each even if the other fails.
    fn write_duties(&mut self, duties: [u8; Indicator::COUNT]) -> bool {
        let mut all_ok = true;
        for indicator in Indicator::ALL {
            all_ok &= self
                .ports
                .indicators
                .set_duty(indicator, duties[indicator as usize])
                .is_ok();
        }
        all_ok
    }

    fn render_display(&mut self) {
        if !self
            .health
            .observe(Subsystem::Display, self.ports.display.is_ready())
        {
            return;
        }
        if self.ports.audio.is_connected() {
            let snapshot = self.level_snapshot();
            self.ports
                .display
                .render(self.fsm.current_state(), &snapshot);
        } else {
            self.ports.display.render_message(DISCONNECTED_MESSAGE);
        }
    }

    // ── Internal: error mode ──────────────────────────────────

    fn enter_error_mode(&mut self) {
        self.ports.audio.set_output_muted(true);
        self.output_muted = Some(true);
        self.error_pattern.set_pattern(PatternId::Alternate);
        let (led1, led2) = self.error_pattern.tick(0);
        self.write_duties([led1, led2]);
        self.announce_error();
    }

    fn run_error_mode(&mut self, now_ms: u32) {
        let since_blink = now_ms.wrapping_sub(self.schedule.last_fired_ms(Task::ErrorBlink));
        if self.schedule.fire_if_due(Task::ErrorBlink, now_ms) {
            let (led1, led2) = self.error_pattern.tick(since_blink);
            self.write_duties([led1, led2]);
        }
        if self.schedule.fire_if_due(Task::ErrorAnnounce, now_ms) {
            self.announce_error();
        }
    }

    fn announce_error(&mut self) {
        let Some(err) = self.health.init_failure() else {
            return;
        };
        error!("Initialisation failed: {err}; restart required");
        self.ports.display.render_error(&error_text(err));
    }
}

/// Short text for the error screen.
fn error_text(err: InitError) -> heapless::String<64> {
    let mut s = heapless::String::new();
    let _ = write!(s, "INIT FAIL: {}", err.subsystem);
    s
}
