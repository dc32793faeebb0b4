//! Simulated audio engine for host runs.
//!
//! Produces a deterministic synthetic programme: a slow triangle envelope
//! on the input with a slight left/right offset, and periodic silent gaps
//! that model the USB host detaching.  The output channels mirror the
//! input unless muted.
//!
//! "Connected" is derived from signal presence: any input peak at or
//! above [`PRESENCE_THRESHOLD`] within the last [`PRESENCE_HOLD_READS`]
//! reads counts as an attached host.

use crate::app::ports::{AudioEngine, SampleRate};
use crate::control::smoothing::LevelChannelId;
use crate::error::InitError;

/// Input peak treated as "signal present".
pub const PRESENCE_THRESHOLD: f32 = 0.001;
/// Reads of silence before the host is considered gone.
pub const PRESENCE_HOLD_READS: u32 = 30;

/// Envelope period in input reads.
const ENVELOPE_PERIOD: u32 = 80;
/// Every `GAP_EVERY` reads the host disappears for `GAP_LEN` reads.
const GAP_EVERY: u32 = 600;
const GAP_LEN: u32 = 100;

/// Deterministic stand-in for the codec + USB audio stack.
#[derive(Debug, Default)]
pub struct SimAudioEngine {
    reads: u32,
    input_peak: f32,
    silent_reads: u32,
    muted: bool,
    init_failure: Option<InitError>,
}

impl SimAudioEngine {
    pub fn new() -> Self {
        Self {
            // Nothing heard yet.
            silent_reads: PRESENCE_HOLD_READS,
            ..Self::default()
        }
    }

    /// Make the next `init()` fail with `err`.
    pub fn fail_init_with(mut self, err: InitError) -> Self {
        self.init_failure = Some(err);
        self
    }

    /// Triangle envelope in [0, 0.9], zero during host gaps.
    fn envelope(reads: u32) -> f32 {
        if reads % GAP_EVERY >= GAP_EVERY - GAP_LEN {
            return 0.0;
        }
        let pos = reads % ENVELOPE_PERIOD;
        let half = ENVELOPE_PERIOD / 2;
        let ramp = if pos < half { pos } else { ENVELOPE_PERIOD - pos };
        0.9 * ramp as f32 / half as f32
    }
}

impl AudioEngine for SimAudioEngine {
    fn init(&mut self) -> Result<(), InitError> {
        match self.init_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn level(&mut self, channel: LevelChannelId) -> f32 {
        // One envelope step per level-update pass, keyed on the first channel.
        if channel == LevelChannelId::InputLeft {
            self.reads = self.reads.wrapping_add(1);
            self.input_peak = Self::envelope(self.reads);
            if self.input_peak >= PRESENCE_THRESHOLD {
                self.silent_reads = 0;
            } else {
                self.silent_reads = self.silent_reads.saturating_add(1);
            }
        }
        let input = match channel {
            LevelChannelId::InputLeft | LevelChannelId::OutputLeft => self.input_peak,
            LevelChannelId::InputRight | LevelChannelId::OutputRight => self.input_peak * 0.85,
        };
        match channel {
            LevelChannelId::InputLeft | LevelChannelId::InputRight => input,
            LevelChannelId::OutputLeft | LevelChannelId::OutputRight => {
                if self.muted {
                    0.0
                } else {
                    input
                }
            }
        }
    }

    fn set_output_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_connected(&self) -> bool {
        self.silent_reads < PRESENCE_HOLD_READS
    }

    fn sample_rate(&self) -> SampleRate {
        if self.is_connected() {
            SampleRate::Hz48k
        } else {
            SampleRate::Unknown
        }
    }
}
