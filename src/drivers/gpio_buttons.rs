//! GPIO button reader.
//!
//! The four user buttons pull their pin LOW when pressed (internal
//! pull-ups).  This adapter only inverts the level; debouncing lives in
//! [`InputDebouncer`](super::button::InputDebouncer).

use embedded_hal::digital::InputPin;

use crate::app::ports::ButtonPort;
use crate::drivers::button::Button;

/// Active-low button bank, one pin per [`Button`].
pub struct GpioButtons<P: InputPin> {
    pins: [P; Button::COUNT],
}

impl<P: InputPin> GpioButtons<P> {
    /// Pins in [`Button::ALL`] order: Up, Down, Left, Right.
    pub fn new(pins: [P; Button::COUNT]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin> ButtonPort for GpioButtons<P> {
    fn is_pressed(&mut self, button: Button) -> Option<bool> {
        self.pins[button as usize].is_low().ok()
    }
}
