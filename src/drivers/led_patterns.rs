//! Indicator LED pattern engine.
//!
//! Generates time-varying duty pairs for the two indicator LEDs while the
//! normal level display is suspended.  The dispatcher calls `tick()` on the
//! LED cadence and writes the returned pair straight to the indicators.
//!
//! ## Pattern types
//!
//! | Pattern   | LED 1              | LED 2              |
//! |-----------|--------------------|--------------------|
//! | Off       | 0                  | 0                  |
//! | Alternate | on for first half  | on for second half |
//!
//! A half-period is the configured blink interval.

use crate::pins::PWM_MAX_DUTY;

/// Duty pair (LED 1, LED 2).
pub type DutyPair = (u8, u8);

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternId {
    #[default]
    Off,
    /// LED 1 and LED 2 take turns.  Used for latched init failures.
    Alternate,
}

/// LED pattern engine.  Stack-allocated, no heap.
pub struct LedPatternEngine {
    phase_ms: u32,
    half_period_ms: u32,
    on_duty: u8,
    pattern: PatternId,
}

impl LedPatternEngine {
    pub fn new(half_period_ms: u32) -> Self {
        Self {
            phase_ms: 0,
            half_period_ms: half_period_ms.max(1),
            on_duty: PWM_MAX_DUTY,
            pattern: PatternId::Off,
        }
    }

    /// Select a pattern.  Changing pattern restarts its phase.
    pub fn set_pattern(&mut self, pattern: PatternId) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.phase_ms = 0;
        }
    }

    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    /// Advance the pattern phase and return the current duty pair.
    /// `delta_ms` is the time since the last call.
    pub fn tick(&mut self, delta_ms: u32) -> DutyPair {
        let period = self.half_period_ms.saturating_mul(2);
        self.phase_ms = (self.phase_ms.wrapping_add(delta_ms)) % period;
        self.generate()
    }

    fn generate(&self) -> DutyPair {
        let first_half = self.phase_ms < self.half_period_ms;
        let on = self.on_duty;
        match self.pattern {
            PatternId::Off => (0, 0),
            PatternId::Alternate => {
                if first_half {
                    (on, 0)
                } else {
                    (0, on)
                }
            }
        }
    }
}
