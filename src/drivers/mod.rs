//! LED drivers, rendering, and one-shot hardware initialisation.

pub mod hw_init;
pub mod led_patterns;
pub mod pwm;
pub mod renderer;
