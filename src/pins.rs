//! GPIO / peripheral pin assignments for the Songbird board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// User buttons (active LOW, internal pull-ups)
// ---------------------------------------------------------------------------

/// Top button: toggles Standby / Active.
pub const BTN_UP_PIN: u8 = 5;
/// Bottom button: toggles Muted.
pub const BTN_DOWN_PIN: u8 = 4;
/// Left button: reserved.
pub const BTN_LEFT_PIN: u8 = 6;
/// Right button: reserved.
pub const BTN_RIGHT_PIN: u8 = 3;

// ---------------------------------------------------------------------------
// Indicator LEDs (PWM capable)
// ---------------------------------------------------------------------------

/// Blue LED: input level indicator.
pub const LED_1_PIN: u8 = 14;
/// Pink LED: output level indicator.
pub const LED_2_PIN: u8 = 15;

// ---------------------------------------------------------------------------
// Status display (SSD1306 on the secondary I²C bus)
// ---------------------------------------------------------------------------

pub const OLED_I2C_ADDR: u8 = 0x3C;
pub const OLED_WIDTH: u32 = 128;
pub const OLED_HEIGHT: u32 = 32;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Duty resolution of the indicator outputs.  8-bit gives 0..=255.
pub const PWM_MAX_DUTY: u8 = u8::MAX;
