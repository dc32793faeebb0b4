//! Periodic runtime diagnostics.
//!
//! On its long interval the dispatcher gathers a [`DiagnosticsReport`]
//! from its components and hands it to the [`DiagnosticsAggregator`],
//! which formats one line into a fixed-capacity buffer and sends it to the
//! [`DiagnosticsSink`].  The aggregator only ever sees copies; it cannot
//! mutate component state.
//!
//! ```text
//! DIAG | up=12.3s cycles=615 | state=Active usb=yes 48k |
//!        in=0.12/0.10 out=0.30/0.29 | led=120/200 |
//!        not_ready=0b0000 ever=0b0000 skipped=0 | transitions=2 edges=3
//! ```

use core::fmt::Write;

use crate::app::ports::{DiagnosticsSink, SampleRate};
use crate::control::brightness::Indicator;
use crate::control::smoothing::LevelChannelId;
use crate::fsm::StateId;

/// Capacity of one formatted report line.
pub const REPORT_CAPACITY: usize = 256;

/// Point-in-time copy of everything worth reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticsReport {
    /// Milliseconds since `start()`, wrapping.
    pub uptime_ms: u32,
    /// Main dispatch cycles run.
    pub cycles: u32,
    pub state: StateId,
    /// Smoothed levels indexed by [`LevelChannelId`].
    pub levels: [f32; LevelChannelId::COUNT],
    /// Current indicator duties indexed by [`Indicator`].
    pub duties: [u8; Indicator::COUNT],
    pub connected: bool,
    pub sample_rate: SampleRate,
    /// Subsystems not ready as of their latest check.
    pub not_ready_mask: u8,
    /// Subsystems that have ever been not ready.
    pub sticky_mask: u8,
    pub skipped_updates: u32,
    pub transitions: u32,
    pub edges: u32,
    /// Latched init failure in effect.
    pub error_mode: bool,
}

/// Formats reports and forwards them to a sink.
#[derive(Debug, Default)]
pub struct DiagnosticsAggregator;

impl DiagnosticsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Render `report` as a single line.  Output past
    /// [`REPORT_CAPACITY`] is dropped.
    pub fn format(report: &DiagnosticsReport) -> heapless::String<REPORT_CAPACITY> {
        let mut s = heapless::String::new();
        let r = report;
        let _ = write!(
            s,
            "DIAG | up={}.{}s cycles={} | state={} usb={} {} | ",
            r.uptime_ms / 1000,
            (r.uptime_ms % 1000) / 100,
            r.cycles,
            if r.error_mode { "ERROR" } else { r.state.name() },
            if r.connected { "yes" } else { "no" },
            r.sample_rate,
        );
        let _ = write!(
            s,
            "in={:.2}/{:.2} out={:.2}/{:.2} | led={}/{} | ",
            r.levels[LevelChannelId::InputLeft as usize],
            r.levels[LevelChannelId::InputRight as usize],
            r.levels[LevelChannelId::OutputLeft as usize],
            r.levels[LevelChannelId::OutputRight as usize],
            r.duties[Indicator::Led1 as usize],
            r.duties[Indicator::Led2 as usize],
        );
        let _ = write!(
            s,
            "not_ready=0b{:04b} ever=0b{:04b} skipped={} | transitions={} edges={}",
            r.not_ready_mask, r.sticky_mask, r.skipped_updates, r.transitions, r.edges,
        );
        s
    }

    /// Format and emit one report.
    pub fn emit(&self, report: &DiagnosticsReport, sink: &mut impl DiagnosticsSink) {
        let line = Self::format(report);
        sink.report(&line);
    }
}
