//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TickDispatcher (domain)
//! ```
//!
//! Driven adapters (audio engine, display, buttons, indicator LEDs,
//! diagnostics output) implement these traits.  The
//! [`TickDispatcher`](super::dispatcher::TickDispatcher) owns them via
//! generics, so the core never touches hardware directly.
//!
//! ## Contract
//!
//! Every method is called from the single control thread and must return
//! without blocking.  Methods are safe to call on every tick.

use core::fmt;

use crate::control::brightness::Indicator;
use crate::control::smoothing::{LevelChannelId, LevelSnapshot};
use crate::drivers::button::Button;
use crate::error::{InitError, WriteError};
use crate::fsm::StateId;

// ───────────────────────────────────────────────────────────────
// Audio engine (driven adapter: codec / USB audio ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Sample rate negotiated by the audio host, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRate {
    Hz44k,
    Hz48k,
    #[default]
    Unknown,
}

impl SampleRate {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hz44k => "44k",
            Self::Hz48k => "48k",
            Self::Unknown => "??k",
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The audio signal path, treated as a black box.
///
/// The engine may run its own interrupt/DMA context; implementations must
/// expose only lock-free, non-blocking accessors.
pub trait AudioEngine {
    /// Bring the engine up.  Called once from `TickDispatcher::start`.
    fn init(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    /// `false` skips this cycle's level update.
    fn is_ready(&self) -> bool {
        true
    }

    /// Latest instantaneous peak level for `channel`, nominally in [0, 1].
    fn level(&mut self, channel: LevelChannelId) -> f32;

    /// Silence (`true`) or restore (`false`) the output path.
    fn set_output_muted(&mut self, muted: bool);

    /// Whether an audio host is currently attached.
    fn is_connected(&self) -> bool;

    fn sample_rate(&self) -> SampleRate;
}

// ───────────────────────────────────────────────────────────────
// Display (driven adapter: domain → status screen)
// ───────────────────────────────────────────────────────────────

/// Status display sink.  Performs no rate limiting of its own; the
/// dispatcher only calls it on the render cadence.
pub trait Display {
    fn init(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }

    /// Normal status view: mode plus level meters.
    fn render(&mut self, state: StateId, levels: &LevelSnapshot);

    /// Full-screen informational message.
    fn render_message(&mut self, text: &str);

    /// Full-screen error view.
    fn render_error(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Diagnostics sink (driven adapter: domain → serial / log)
// ───────────────────────────────────────────────────────────────

/// Write-only receiver of periodic text reports.  Fire-and-forget.
pub trait DiagnosticsSink {
    fn report(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Buttons (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Raw physical button readings, already normalised so `true` = pressed.
pub trait ButtonPort {
    /// `None` when the pin could not be read this scan.
    fn is_pressed(&mut self, button: Button) -> Option<bool>;
}

// ───────────────────────────────────────────────────────────────
// Indicator LEDs (driven adapter: domain → PWM)
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    fn init(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    /// Whether the outputs can be driven at all.  Independent of the
    /// outcome of earlier writes.
    fn is_ready(&self) -> bool {
        true
    }

    /// Write an 8-bit duty cycle to one indicator.  A failed write is
    /// reported, not retried; the next update writes again.
    fn set_duty(&mut self, indicator: Indicator, duty: u8) -> Result<(), WriteError>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; consumers compare
/// with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}
