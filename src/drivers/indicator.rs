//! Indicator LED driver.
//!
//! Two PWM channels drive the blue (input) and pink (output) level LEDs.
//! Generic over `embedded_hal::pwm::SetDutyCycle` (v1.0), so the same
//! driver runs on the board timers and on the host simulation pins.
//!
//! Duty values arrive in the 8-bit domain used by the brightness mapper
//! and are scaled onto the channel's native resolution.
//!
//! A failed write is returned to the caller and logged once per run of
//! failures; it does not make the driver unavailable.  The next write is
//! attempted normally and a success ends the run.

use embedded_hal::pwm::SetDutyCycle;
use log::{info, warn};

use crate::app::ports::IndicatorPort;
use crate::control::brightness::Indicator;
use crate::error::{InitError, Subsystem, WriteError};
use crate::pins::PWM_MAX_DUTY;

/// Two-LED PWM driver.
pub struct PwmIndicators<P: SetDutyCycle> {
    channels: [P; Indicator::COUNT],
    /// Failed writes since the last successful one.
    consecutive_errors: u32,
}

impl<P: SetDutyCycle> PwmIndicators<P> {
    /// Takes ownership of the LED 1 and LED 2 channels, in that order.
    pub fn new(led1: P, led2: P) -> Self {
        Self {
            channels: [led1, led2],
            consecutive_errors: 0,
        }
    }
}

impl<P: SetDutyCycle> IndicatorPort for PwmIndicators<P> {
    fn init(&mut self) -> Result<(), InitError> {
        for indicator in Indicator::ALL {
            let ch = &mut self.channels[indicator as usize];
            if ch.max_duty_cycle() == 0 {
                return Err(InitError::new(Subsystem::Indicators, "PWM channel has no range"));
            }
            ch.set_duty_cycle_fully_off()
                .map_err(|_| InitError::new(Subsystem::Indicators, "PWM write failed"))?;
        }
        info!(
            "Indicators: LED1 on pin {}, LED2 on pin {}",
            Indicator::Led1.pin(),
            Indicator::Led2.pin()
        );
        Ok(())
    }

    fn set_duty(&mut self, indicator: Indicator, duty: u8) -> Result<(), WriteError> {
        let ch = &mut self.channels[indicator as usize];
        match ch.set_duty_cycle_fraction(u16::from(duty), u16::from(PWM_MAX_DUTY)) {
            Ok(()) => {
                if self.consecutive_errors > 0 {
                    info!(
                        "Indicators: writes recovered after {} failure(s)",
                        self.consecutive_errors
                    );
                    self.consecutive_errors = 0;
                }
                Ok(())
            }
            Err(e) => {
                if self.consecutive_errors == 0 {
                    warn!("Indicators: {} write failed: {e:?}", indicator.name());
                }
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                Err(WriteError::new(Subsystem::Indicators, "PWM channel rejected duty"))
            }
        }
    }
}
