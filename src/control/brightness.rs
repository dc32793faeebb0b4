//! Perceptual LED brightness mapping.
//!
//! Two stages, deliberately kept separate:
//!
//! ```text
//!   smoothed level ──▶ dead zone ──▶ √level · (max − min) + min ──▶ target
//!   target ──▶ current += round((target − current) · β) ──▶ PWM duty
//! ```
//!
//! The square root approximates perceived loudness; the β stage removes
//! flicker from target jumps caused by state changes or transients.

use crate::config::SystemConfig;
use crate::fsm::StateId;
use crate::pins;

// ---------------------------------------------------------------------------
// Indicator identity
// ---------------------------------------------------------------------------

/// The two level indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Indicator {
    /// Blue: input level.
    Led1 = 0,
    /// Pink: output level.
    Led2 = 1,
}

impl Indicator {
    pub const COUNT: usize = 2;
    pub const ALL: [Indicator; Indicator::COUNT] = [Indicator::Led1, Indicator::Led2];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Led1 => "LED1",
            Self::Led2 => "LED2",
        }
    }

    pub const fn pin(self) -> u8 {
        match self {
            Self::Led1 => pins::LED_1_PIN,
            Self::Led2 => pins::LED_2_PIN,
        }
    }
}

// ---------------------------------------------------------------------------
// Output-domain smoothing
// ---------------------------------------------------------------------------

/// Target and current duty for one LED.  Only `current` reaches hardware.
#[derive(Debug, Clone, Copy)]
pub struct BrightnessChannel {
    target: u8,
    current: u8,
    beta: f32,
}

impl BrightnessChannel {
    pub fn new(beta: f32) -> Self {
        let beta = if beta.is_nan() { 1.0 } else { beta.clamp(0.001, 1.0) };
        Self {
            target: 0,
            current: 0,
            beta,
        }
    }

    pub fn set_target(&mut self, target: u8) {
        self.target = target;
    }

    /// Move `current` one step toward `target` and return it.
    ///
    /// A step that rounds to zero is promoted to ±1, so `current` reaches
    /// `target` in at most `|target − current|` steps.
    pub fn step(&mut self) -> u8 {
        let diff = i16::from(self.target) - i16::from(self.current);
        if diff == 0 {
            return self.current;
        }
        let mut delta = (f32::from(diff) * self.beta).round() as i16;
        if delta == 0 {
            delta = diff.signum();
        }
        self.current = (i16::from(self.current) + delta).clamp(0, i16::from(u8::MAX)) as u8;
        self.current
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }
}

// ---------------------------------------------------------------------------
// Mapper
// ---------------------------------------------------------------------------

/// Maps smoothed audio levels to indicator duty cycles.
pub struct BrightnessMapper {
    channels: [BrightnessChannel; Indicator::COUNT],
    threshold: f32,
    min: u8,
    max: u8,
}

impl BrightnessMapper {
    pub fn new(threshold: f32, min: u8, max: u8, beta: f32) -> Self {
        Self {
            channels: [BrightnessChannel::new(beta); Indicator::COUNT],
            threshold,
            min: min.min(max),
            max,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            config.level_threshold,
            config.brightness_min,
            config.brightness_max,
            config.led_alpha,
        )
    }

    /// Perceptual target duty for a smoothed level in [0, 1].
    pub fn map_level(&self, level: f32) -> u8 {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        if level < self.threshold {
            return 0;
        }
        let span = f32::from(self.max - self.min);
        (f32::from(self.min) + level.sqrt() * span)
            .round()
            .clamp(0.0, f32::from(u8::MAX)) as u8
    }

    /// Set both targets from the combined levels and the current mode.
    ///
    /// | State   | LED 1        | LED 2         |
    /// |---------|--------------|---------------|
    /// | Standby | 0            | 0             |
    /// | Active  | map(input)   | map(output)   |
    /// | Muted   | map(input)   | 0             |
    pub fn set_targets(&mut self, state: StateId, input: f32, output: f32) {
        let (led1, led2) = match state {
            StateId::Standby => (0, 0),
            StateId::Active => (self.map_level(input), self.map_level(output)),
            StateId::Muted => (self.map_level(input), 0),
        };
        self.channels[Indicator::Led1 as usize].set_target(led1);
        self.channels[Indicator::Led2 as usize].set_target(led2);
    }

    /// Advance both channels one smoothing step.  Returns the new current
    /// duties indexed by [`Indicator`].
    pub fn step(&mut self) -> [u8; Indicator::COUNT] {
        Indicator::ALL.map(|ind| self.channels[ind as usize].step())
    }

    pub fn current(&self, indicator: Indicator) -> u8 {
        self.channels[indicator as usize].current()
    }

    pub fn target(&self, indicator: Indicator) -> u8 {
        self.channels[indicator as usize].target()
    }

    pub fn currents(&self) -> [u8; Indicator::COUNT] {
        Indicator::ALL.map(|ind| self.current(ind))
    }
}
