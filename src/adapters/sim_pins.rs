//! Simulated GPIO and PWM pins for host runs.
//!
//! Each pin shares its level with a handle the host binary keeps, so a
//! script can "press" buttons and watch LED duties while the real
//! [`GpioButtons`](crate::drivers::gpio_buttons::GpioButtons) and
//! [`PwmIndicators`](crate::drivers::indicator::PwmIndicators) drivers run
//! unchanged on top.

use core::convert::Infallible;
use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

use crate::pins::PWM_MAX_DUTY;

// ───────────────────────────────────────────────────────────────
// Button input
// ───────────────────────────────────────────────────────────────

/// Input pin with an internal pull-up: reads high until pressed.
#[derive(Debug, Clone)]
pub struct SimInputPin {
    high: Rc<Cell<bool>>,
}

impl Default for SimInputPin {
    fn default() -> Self {
        Self::new()
    }
}

impl SimInputPin {
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
        }
    }

    /// Handle for driving the pin from outside.
    pub fn handle(&self) -> SimButtonHandle {
        SimButtonHandle {
            high: Rc::clone(&self.high),
        }
    }
}

impl DigitalErrorType for SimInputPin {
    type Error = Infallible;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// Controls one [`SimInputPin`].
#[derive(Debug, Clone)]
pub struct SimButtonHandle {
    high: Rc<Cell<bool>>,
}

impl SimButtonHandle {
    /// Close the switch (pin pulled low).
    pub fn press(&self) {
        self.high.set(false);
    }

    pub fn release(&self) {
        self.high.set(true);
    }
}

// ───────────────────────────────────────────────────────────────
// PWM output
// ───────────────────────────────────────────────────────────────

/// 8-bit PWM channel whose duty can be observed through a handle.
#[derive(Debug, Clone)]
pub struct SimPwmPin {
    duty: Rc<Cell<u16>>,
}

impl Default for SimPwmPin {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPwmPin {
    pub fn new() -> Self {
        Self {
            duty: Rc::new(Cell::new(0)),
        }
    }

    /// Shared view of the current duty.
    pub fn duty_handle(&self) -> Rc<Cell<u16>> {
        Rc::clone(&self.duty)
    }
}

impl PwmErrorType for SimPwmPin {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwmPin {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(PWM_MAX_DUTY)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.set(duty);
        Ok(())
    }
}
