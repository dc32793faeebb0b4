//! Sliding-window button debouncer with one-shot edge detection.
//!
//! ## Hardware
//!
//! Four active-low momentary switches with pull-ups.  Raw levels are
//! sampled by [`InputDebouncer::scan`] at the button-scan cadence; there
//! is no ISR involvement.
//!
//! ## Debounce
//!
//! Every observed raw change restarts the stability timer, so a bouncing
//! contact only commits once it has been quiet for the full debounce
//! interval, measured from its *last* transition.
//!
//! ## Edge states
//!
//! | From     | Condition                 | To       |
//! |----------|---------------------------|----------|
//! | Idle     | debounced becomes pressed | Pressed  |
//! | Pressed  | debounced becomes clear   | Released |
//! | Released | next scan, unconditional  | Idle     |
//!
//! `was_pressed` is a rising-edge pulse (Pressed entered from Idle on this
//! scan); `was_released` is true for the single scan spent in Released.

use heapless::Vec;
use log::debug;

use crate::app::ports::ButtonPort;
use crate::pins;

/// Physical buttons, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Button {
    pub const COUNT: usize = 4;
    pub const ALL: [Button; Button::COUNT] = [Button::Up, Button::Down, Button::Left, Button::Right];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }

    /// GPIO the button is wired to.
    pub const fn pin(self) -> u8 {
        match self {
            Self::Up => pins::BTN_UP_PIN,
            Self::Down => pins::BTN_DOWN_PIN,
            Self::Left => pins::BTN_LEFT_PIN,
            Self::Right => pins::BTN_RIGHT_PIN,
        }
    }
}

/// Edge-detector state, driven only by the debounced level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    #[default]
    Idle,
    Pressed,
    Released,
}

/// Per-button debounce and edge bookkeeping.
#[derive(Debug, Clone)]
pub struct ButtonChannel {
    button: Button,
    raw_pressed: bool,
    debounced_pressed: bool,
    last_change_ms: u32,
    edge: EdgeState,
    prev_edge: EdgeState,
}

impl ButtonChannel {
    pub fn new(button: Button) -> Self {
        Self {
            button,
            raw_pressed: false,
            debounced_pressed: false,
            last_change_ms: 0,
            edge: EdgeState::Idle,
            prev_edge: EdgeState::Idle,
        }
    }

    /// Feed one raw reading taken at `now_ms`.
    pub fn sample(&mut self, raw_pressed: bool, now_ms: u32, debounce_ms: u32) {
        if raw_pressed != self.raw_pressed {
            self.raw_pressed = raw_pressed;
            self.last_change_ms = now_ms;
        }

        if now_ms.wrapping_sub(self.last_change_ms) >= debounce_ms {
            self.debounced_pressed = self.raw_pressed;
        }

        self.prev_edge = self.edge;
        self.edge = match (self.edge, self.debounced_pressed) {
            (EdgeState::Released, _) => EdgeState::Idle,
            (EdgeState::Idle, true) => EdgeState::Pressed,
            (EdgeState::Pressed, false) => EdgeState::Released,
            (same, _) => same,
        };
    }

    /// Rising edge: true on exactly one scan per physical press.
    pub fn was_pressed(&self) -> bool {
        self.edge == EdgeState::Pressed && self.prev_edge == EdgeState::Idle
    }

    /// Falling edge: true on the single scan spent in `Released`.
    pub fn was_released(&self) -> bool {
        self.edge == EdgeState::Released
    }

    pub fn button(&self) -> Button {
        self.button
    }

    pub fn name(&self) -> &'static str {
        self.button.name()
    }

    pub fn pin(&self) -> u8 {
        self.button.pin()
    }

    pub fn raw_pressed(&self) -> bool {
        self.raw_pressed
    }

    pub fn is_pressed(&self) -> bool {
        self.debounced_pressed
    }

    pub fn last_change_ms(&self) -> u32 {
        self.last_change_ms
    }

    pub fn edge(&self) -> EdgeState {
        self.edge
    }
}

/// Result of one scan over all channels.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Buttons whose rising edge fired on this scan, in scan order.
    pub pressed: Vec<Button, { Button::COUNT }>,
    /// At least one pin could not be read; that channel was left untouched.
    pub unreadable: bool,
}

/// Owns all four button channels.
pub struct InputDebouncer {
    channels: [ButtonChannel; Button::COUNT],
    debounce_ms: u32,
}

impl InputDebouncer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            channels: Button::ALL.map(ButtonChannel::new),
            debounce_ms,
        }
    }

    /// Sample every button from `port` and advance the edge machines.
    pub fn scan(&mut self, port: &mut impl ButtonPort, now_ms: u32) -> ScanOutcome {
        self.scan_with(now_ms, |button| port.is_pressed(button))
    }

    /// Same as [`scan`](Self::scan) with an arbitrary reader.
    pub fn scan_with(
        &mut self,
        now_ms: u32,
        mut read: impl FnMut(Button) -> Option<bool>,
    ) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for ch in &mut self.channels {
            // An unreadable channel sits this scan out: no commit, no edge.
            let Some(raw) = read(ch.button) else {
                outcome.unreadable = true;
                continue;
            };
            ch.sample(raw, now_ms, self.debounce_ms);

            if ch.was_pressed() {
                debug!("Button {} (pin {}) pressed", ch.name(), ch.pin());
                // Capacity equals channel count; cannot overflow.
                let _ = outcome.pressed.push(ch.button);
            } else if ch.was_released() {
                debug!("Button {} (pin {}) released", ch.name(), ch.pin());
            }
        }

        outcome
    }

    pub fn was_pressed(&self, button: Button) -> bool {
        self.channel(button).was_pressed()
    }

    pub fn was_released(&self, button: Button) -> bool {
        self.channel(button).was_released()
    }

    pub fn channel(&self, button: Button) -> &ButtonChannel {
        &self.channels[button as usize]
    }

    pub fn channels(&self) -> &[ButtonChannel] {
        &self.channels
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }
}
