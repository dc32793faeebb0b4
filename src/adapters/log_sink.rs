//! Log-based diagnostics sink adapter.
//!
//! Implements [`DiagnosticsSink`] by writing each report line to the
//! logger (stderr on host, the serial console on the board).

use log::info;

use crate::app::ports::DiagnosticsSink;

/// Adapter that logs every diagnostics report.
#[derive(Debug, Default)]
pub struct LogDiagnosticsSink;

impl LogDiagnosticsSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for LogDiagnosticsSink {
    fn report(&mut self, text: &str) {
        info!("{text}");
    }
}
