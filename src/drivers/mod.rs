//! Input and indicator drivers plus the error-pattern generator.

pub mod button;
pub mod gpio_buttons;
pub mod indicator;
pub mod led_patterns;
