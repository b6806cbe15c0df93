//! Color renderer for the RGB status LED.
//!
//! Turns a color name plus an overall power percentage into three
//! duty-cycle writes. Two timed primitives are built on top:
//!
//! | Primitive | Writes                          | Sleeps              |
//! |-----------|---------------------------------|---------------------|
//! | `hold`    | 3 (full power)                  | 1 × `duration`      |
//! | `pulse`   | 3 × (2N + 1) levels, 0→P→0      | 2N × `duration/2N`  |
//!
//! Both block for their whole duration. Unknown color names fail with
//! [`Error::UnknownColor`] before anything is written.

use std::time::Duration;

use log::trace;

use crate::app::ports::{Delay, PwmDevice};
use crate::color::{Color, ColorTable};
use crate::drivers::pwm::{Channel, PwmChannelDriver, clamp_percentage};
use crate::error::{Error, Result};

/// Ramp steps per half pulse.
pub const DEFAULT_PULSE_STEPS: u32 = 10;

/// Upper bound on ramp steps per half pulse.
pub const MAX_PULSE_STEPS: u32 = 1000;

/// Full brightness.
pub const FULL_POWER: f32 = 100.0;

/// Brightness levels of one pulse: `N` equal steps from 0 up to `power`,
/// then back down to 0 (`2N + 1` levels, peak shared).
///
/// A zero `power` collapses to the single level `[0.0]`. `steps` is clamped
/// to `1..=MAX_PULSE_STEPS`.
pub fn pulse_levels(power: f32, steps: u32) -> Vec<f32> {
    let power = clamp_percentage(power);
    let n = steps.clamp(1, MAX_PULSE_STEPS) as usize;
    if power <= 0.0 {
        return vec![0.0];
    }
    (0..=2 * n)
        .map(|i| {
            let k = i.min(2 * n - i);
            power * (k as f32 / n as f32)
        })
        .collect()
}

pub struct Renderer<D, T> {
    driver: PwmChannelDriver<D>,
    colors: ColorTable,
    delay: T,
    pulse_steps: u32,
}

impl<D: PwmDevice, T: Delay> Renderer<D, T> {
    pub fn new(driver: PwmChannelDriver<D>, colors: ColorTable, delay: T) -> Self {
        Self {
            driver,
            colors,
            delay,
            pulse_steps: DEFAULT_PULSE_STEPS,
        }
    }

    /// Override the number of ramp steps per half pulse, clamped to
    /// `1..=MAX_PULSE_STEPS`.
    #[must_use]
    pub fn with_pulse_steps(mut self, steps: u32) -> Self {
        self.pulse_steps = steps.clamp(1, MAX_PULSE_STEPS);
        self
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn driver(&self) -> &PwmChannelDriver<D> {
        &self.driver
    }

    pub fn pulse_steps(&self) -> u32 {
        self.pulse_steps
    }

    fn resolve(&self, name: &str) -> Result<Color> {
        self.colors
            .lookup(name)
            .ok_or_else(|| Error::UnknownColor(name.to_owned()))
    }

    fn write(&self, color: Color, power: f32) -> Result<()> {
        for ch in Channel::ALL {
            self.driver.set_duty_cycle(ch, color.intensity(ch) * power)?;
        }
        Ok(())
    }

    /// Show `name` at `power` percent immediately. No sleep.
    pub fn set_color(&self, name: &str, power: f32) -> Result<()> {
        let color = self.resolve(name)?;
        self.write(color, clamp_percentage(power))
    }

    /// Turn all three channels off.
    pub fn off(&self) -> Result<()> {
        self.write(Color::new(0.0, 0.0, 0.0), FULL_POWER)
    }

    /// Show `name` at full power, then block for `duration`.
    pub fn hold(&self, name: &str, duration: Duration) -> Result<()> {
        let color = self.resolve(name)?;
        trace!("hold {name} for {duration:?}");
        self.write(color, FULL_POWER)?;
        self.delay.delay(duration);
        Ok(())
    }

    /// Ramp `name` from off up to `power` percent and back over `duration`.
    pub fn pulse(&self, name: &str, duration: Duration, power: f32) -> Result<()> {
        let color = self.resolve(name)?;
        let levels = pulse_levels(power, self.pulse_steps);
        trace!("pulse {name} over {duration:?}, {} levels", levels.len());

        if let [level] = levels.as_slice() {
            self.write(color, *level)?;
            self.delay.delay(duration);
            return Ok(());
        }

        let last = levels.len() - 1;
        let per_step = duration / u32::try_from(last).unwrap_or(u32::MAX);
        for (i, level) in levels.into_iter().enumerate() {
            self.write(color, level)?;
            if i < last {
                self.delay.delay(per_step);
            }
        }
        Ok(())
    }
}
