//! Exponential level smoothing for the audio meters.
//!
//! Each channel runs `y ← y·(1−α) + x·α` once per level-update tick.  With
//! α in (0, 1] a constant input is approached monotonically.

use crate::app::ports::SampleRate;

/// Smallest accepted α.  Anything below is clamped up so the filter always
/// makes progress.
const ALPHA_MIN: f32 = 0.001;

/// Metered audio channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LevelChannelId {
    InputLeft = 0,
    InputRight = 1,
    OutputLeft = 2,
    OutputRight = 3,
}

impl LevelChannelId {
    pub const COUNT: usize = 4;
    pub const ALL: [LevelChannelId; LevelChannelId::COUNT] = [
        LevelChannelId::InputLeft,
        LevelChannelId::InputRight,
        LevelChannelId::OutputLeft,
        LevelChannelId::OutputRight,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputLeft => "in_l",
            Self::InputRight => "in_r",
            Self::OutputLeft => "out_l",
            Self::OutputRight => "out_r",
        }
    }
}

/// Clamp a sample into [0, 1]; NaN reads as silence.
fn sanitize(sample: f32) -> f32 {
    if sample.is_nan() { 0.0 } else { sample.clamp(0.0, 1.0) }
}

/// One smoothed level.
#[derive(Debug, Clone, Copy)]
pub struct LevelChannel {
    instant: f32,
    smoothed: f32,
    alpha: f32,
}

impl LevelChannel {
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(ALPHA_MIN, 1.0) };
        Self {
            instant: 0.0,
            smoothed: 0.0,
            alpha,
        }
    }

    /// Fold one instantaneous sample into the running value.
    pub fn update(&mut self, sample: f32) -> f32 {
        self.instant = sanitize(sample);
        self.smoothed =
            (self.smoothed * (1.0 - self.alpha) + self.instant * self.alpha).clamp(0.0, 1.0);
        self.smoothed
    }

    pub fn instant(&self) -> f32 {
        self.instant
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// The four metered channels.
pub struct LevelSmoother {
    channels: [LevelChannel; LevelChannelId::COUNT],
}

impl LevelSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            channels: [LevelChannel::new(alpha); LevelChannelId::COUNT],
        }
    }

    /// Update every channel from `read`, called once per channel in
    /// [`LevelChannelId::ALL`] order.
    pub fn update(&mut self, mut read: impl FnMut(LevelChannelId) -> f32) {
        for id in LevelChannelId::ALL {
            self.channels[id as usize].update(read(id));
        }
    }

    pub fn smoothed(&self, id: LevelChannelId) -> f32 {
        self.channels[id as usize].smoothed()
    }

    pub fn channel(&self, id: LevelChannelId) -> &LevelChannel {
        &self.channels[id as usize]
    }

    /// Louder of the two input channels.
    pub fn input_level(&self) -> f32 {
        self.smoothed(LevelChannelId::InputLeft)
            .max(self.smoothed(LevelChannelId::InputRight))
    }

    /// Louder of the two output channels.
    pub fn output_level(&self) -> f32 {
        self.smoothed(LevelChannelId::OutputLeft)
            .max(self.smoothed(LevelChannelId::OutputRight))
    }

    /// Copy of the current levels for display / diagnostics.
    pub fn snapshot(&self, connected: bool, sample_rate: SampleRate) -> LevelSnapshot {
        LevelSnapshot {
            channels: LevelChannelId::ALL.map(|id| self.smoothed(id)),
            input: self.input_level(),
            output: self.output_level(),
            connected,
            sample_rate,
        }
    }
}

/// Point-in-time level readings handed to the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSnapshot {
    /// Per-channel smoothed values, indexed by [`LevelChannelId`].
    pub channels: [f32; LevelChannelId::COUNT],
    /// Combined input level (max of L/R).
    pub input: f32,
    /// Combined output level (max of L/R).
    pub output: f32,
    pub connected: bool,
    pub sample_rate: SampleRate,
}

impl LevelSnapshot {
    pub fn level(&self, id: LevelChannelId) -> f32 {
        self.channels[id as usize]
    }
}

impl Default for LevelSnapshot {
    fn default() -> Self {
        Self {
            channels: [0.0; LevelChannelId::COUNT],
            input: 0.0,
            output: 0.0,
            connected: false,
            sample_rate: SampleRate::Unknown,
        }
    }
}
