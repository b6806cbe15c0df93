//! Pin and PWM channel assignments for the Reach status LED.
//!
//! Single source of truth: the config defaults and the drivers reference this
//! module rather than hard-coding numbers.

// ---------------------------------------------------------------------------
// PWM controller (sysfs)
// ---------------------------------------------------------------------------

/// sysfs directory of the PWM chip that drives the LED.
pub const PWM_CHIP_PATH: &str = "/sys/class/pwm/pwmchip0";

/// PWM period in nanoseconds. Fixed for the lifetime of the process.
pub const PWM_PERIOD: u32 = 1_000_000;

/// PWM channel per color component.
pub const PWM_CH_RED: u8 = 0;
pub const PWM_CH_GREEN: u8 = 1;
pub const PWM_CH_BLUE: u8 = 2;

// ---------------------------------------------------------------------------
// Pin multiplexing (Edison debugfs)
// ---------------------------------------------------------------------------

/// debugfs directory exposing `gpio<N>/current_pinmux`.
pub const PINMUX_ROOT: &str = "/sys/kernel/debug/gpio_debug";

/// Physical pins routed to the LED (green, red, blue on the board).
pub const LED_PWM_PINS: [u32; 3] = [12, 13, 182];

/// Pin-mux mode selecting the PWM function on [`LED_PWM_PINS`].
pub const LED_PINMUX_MODE: &str = "mode1";
