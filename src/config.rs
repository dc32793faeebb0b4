//! System configuration parameters
//!
//! All tunable constants for the Songbird control core.  Values are fixed
//! for the lifetime of the process; the host binary can override them from
//! a JSON document at startup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Task cadences ---
    /// Main dispatch interval (milliseconds)
    pub main_tick_ms: u32,
    /// Button scan / debounce sampling interval (milliseconds)
    pub button_scan_ms: u32,
    /// Level smoothing + LED brightness update interval (milliseconds)
    pub led_update_ms: u32,
    /// Display render interval (milliseconds)
    pub display_update_ms: u32,
    /// Diagnostics report interval (milliseconds)
    pub diagnostics_interval_ms: u32,

    // --- Buttons ---
    /// Raw input must be stable this long before it is committed
    pub debounce_ms: u32,

    // --- Level metering ---
    /// Audio level smoothing factor α (0, 1]
    pub level_alpha: f32,
    /// Levels strictly below this are treated as silence by the LEDs
    pub level_threshold: f32,

    // --- LEDs ---
    /// LED brightness transition factor β (0, 1]
    pub led_alpha: f32,
    /// Minimum visible PWM duty
    pub brightness_min: u8,
    /// Maximum PWM duty
    pub brightness_max: u8,

    // --- Error mode ---
    /// Half-period of the alternating error pattern (milliseconds)
    pub error_blink_ms: u32,
    /// Interval between error re-announcements (milliseconds)
    pub error_announce_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Cadences
            main_tick_ms: 20,                // 50 Hz
            button_scan_ms: 50,              // 20 Hz
            led_update_ms: 100,              // 10 Hz
            display_update_ms: 100,          // 10 Hz
            diagnostics_interval_ms: 10_000, // every 10 s

            // Buttons
            debounce_ms: 50,

            // Level metering
            level_alpha: 0.1,
            level_threshold: 0.01,

            // LEDs
            led_alpha: 0.2,
            brightness_min: 8,
            brightness_max: 255,

            // Error mode
            error_blink_ms: 500,
            error_announce_ms: 5_000,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            (self.main_tick_ms, "main_tick_ms must be > 0"),
            (self.button_scan_ms, "button_scan_ms must be > 0"),
            (self.led_update_ms, "led_update_ms must be > 0"),
            (self.display_update_ms, "display_update_ms must be > 0"),
            (self.diagnostics_interval_ms, "diagnostics_interval_ms must be > 0"),
            (self.error_blink_ms, "error_blink_ms must be > 0"),
            (self.error_announce_ms, "error_announce_ms must be > 0"),
        ];
        for (value, msg) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }

        if !(self.level_alpha > 0.0 && self.level_alpha <= 1.0) {
            return Err(ConfigError::ValidationFailed("level_alpha must be in (0, 1]"));
        }
        if !(self.led_alpha > 0.0 && self.led_alpha <= 1.0) {
            return Err(ConfigError::ValidationFailed("led_alpha must be in (0, 1]"));
        }
        if !(0.0..1.0).contains(&self.level_threshold) {
            return Err(ConfigError::ValidationFailed(
                "level_threshold must be in [0, 1)",
            ));
        }
        if self.brightness_min > self.brightness_max {
            return Err(ConfigError::ValidationFailed(
                "brightness_min must not exceed brightness_max",
            ));
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.  Missing fields take their
    /// default values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}
