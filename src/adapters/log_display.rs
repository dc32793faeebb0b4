//! Log-backed status display.
//!
//! Stands in for the 128×32 SSD1306 on host runs.  Each frame is laid out
//! as one text line, the same content the OLED shows:
//!
//! ```text
//! ♪ [######--] in  48k  out [####----] ♪  USB Loopback Active
//! ```
//!
//! A bird (♪) sings on each side whose level is at or above the metering
//! threshold.  Identical consecutive frames are not re-logged.

use core::fmt::Write;

use log::{error, info};

use crate::app::ports::Display;
use crate::control::smoothing::LevelSnapshot;
use crate::error::InitError;
use crate::fsm::StateId;
use crate::pins;

/// Segments in one level bar.
pub const LEVEL_BAR_SEGMENTS: usize = 8;
/// Level that fills the bar; leaves headroom above.
pub const LEVEL_BAR_MAX: f32 = 0.8;

type Line = heapless::String<128>;

/// Render `level` as `[####----]`.
pub fn level_bar(level: f32) -> heapless::String<{ LEVEL_BAR_SEGMENTS + 2 }> {
    let level = if level.is_nan() { 0.0 } else { level.max(0.0) };
    let filled = ((level / LEVEL_BAR_MAX) * LEVEL_BAR_SEGMENTS as f32) as usize;
    let filled = filled.min(LEVEL_BAR_SEGMENTS);

    let mut bar = heapless::String::new();
    let _ = bar.push('[');
    for i in 0..LEVEL_BAR_SEGMENTS {
        let _ = bar.push(if i < filled { '#' } else { '-' });
    }
    let _ = bar.push(']');
    bar
}

/// Display adapter that writes frames to the log.
pub struct LogDisplay {
    bird_threshold: f32,
    last: Line,
    frames: u32,
}

impl LogDisplay {
    pub fn new(bird_threshold: f32) -> Self {
        Self {
            bird_threshold,
            last: Line::new(),
            frames: 0,
        }
    }

    /// Frames actually logged (duplicates excluded).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// The most recently logged frame.
    pub fn last_frame(&self) -> &str {
        &self.last
    }

    fn bird(&self, level: f32) -> char {
        if level >= self.bird_threshold { '♪' } else { ' ' }
    }

    /// Log `line` unless it repeats the previous frame.
    fn show(&mut self, line: Line) -> bool {
        if line == self.last {
            return false;
        }
        self.last = line;
        self.frames = self.frames.wrapping_add(1);
        true
    }
}

impl Display for LogDisplay {
    fn init(&mut self) -> Result<(), InitError> {
        info!(
            "Display: SSD1306 {}x{} @ 0x{:02X} (log-backed)",
            pins::OLED_WIDTH,
            pins::OLED_HEIGHT,
            pins::OLED_I2C_ADDR
        );
        Ok(())
    }

    fn render(&mut self, state: StateId, levels: &LevelSnapshot) {
        let mut line = Line::new();
        let _ = write!(
            line,
            "{} {} in  {}  out {} {}  {}",
            self.bird(levels.input),
            level_bar(levels.input),
            levels.sample_rate,
            level_bar(levels.output),
            self.bird(levels.output),
            state.status_message(),
        );
        if self.show(line) {
            info!("DISPLAY | {}", self.last);
        }
    }

    fn render_message(&mut self, text: &str) {
        let mut line = Line::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        if self.show(line) {
            info!("DISPLAY | {}", self.last);
        }
    }

    fn render_error(&mut self, text: &str) {
        // Always shown; the announcement cadence is the rate limit.
        error!("DISPLAY | !! {text} !!");
        self.frames = self.frames.wrapping_add(1);
    }
}
