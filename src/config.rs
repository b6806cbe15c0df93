//! LED configuration parameters.
//!
//! Defaults reproduce the Reach board wiring from [`crate::pins`]. A JSON
//! file can override any subset of fields.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorTable};
use crate::drivers::led_patterns::PATTERN_DELIMITER;
use crate::drivers::renderer::{DEFAULT_PULSE_STEPS, MAX_PULSE_STEPS};
use crate::error::{Error, Result};
use crate::pins;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    // --- Device ---
    /// sysfs directory of the PWM chip
    pub pwm_chip: PathBuf,
    /// PWM period (ns), applied once at bootstrap
    pub period: u32,

    // --- Pin-mux ---
    /// debugfs pin-mux root; `None` skips pin-mux configuration
    pub pinmux_root: Option<PathBuf>,
    /// Physical pins routed to the LED
    pub pinmux_pins: Vec<u32>,
    /// Mode written to each pin
    pub pinmux_mode: String,

    // --- Rendering ---
    /// Ramp steps per half pulse
    pub pulse_steps: u32,
    /// Per-color delay when the caller does not give one (milliseconds)
    pub default_delay_ms: u64,
    /// Colors added to (or overriding) the builtin table
    pub extra_colors: BTreeMap<String, Color>,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            pwm_chip: PathBuf::from(pins::PWM_CHIP_PATH),
            period: pins::PWM_PERIOD,

            pinmux_root: Some(PathBuf::from(pins::PINMUX_ROOT)),
            pinmux_pins: pins::LED_PWM_PINS.to_vec(),
            pinmux_mode: pins::LED_PINMUX_MODE.to_owned(),

            pulse_steps: DEFAULT_PULSE_STEPS,
            default_delay_ms: 500,
            extra_colors: BTreeMap::new(),
        }
    }
}

impl LedConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(Error::Config("period must be > 0"));
        }
        if self.pulse_steps == 0 {
            return Err(Error::Config("pulse_steps must be >= 1"));
        }
        if self.pulse_steps > MAX_PULSE_STEPS {
            return Err(Error::Config("pulse_steps must be <= 1000"));
        }
        if self.pinmux_root.is_some() && self.pinmux_mode.is_empty() {
            return Err(Error::Config("pinmux_mode must not be empty"));
        }
        for (name, color) in &self.extra_colors {
            if name.is_empty() || name.contains(PATTERN_DELIMITER) || !color.is_valid() {
                return Err(Error::InvalidColor(name.clone()));
            }
        }
        Ok(())
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms)
    }

    /// Builtin colors plus [`extra_colors`](Self::extra_colors).
    pub fn color_table(&self) -> Result<ColorTable> {
        ColorTable::with_extra(
            self.extra_colors
                .iter()
                .map(|(name, color)| (name.clone(), *color)),
        )
    }
}
