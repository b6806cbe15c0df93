//! PWM channel driver for the three LED channels.
//!
//! Converts a brightness percentage into the inverted duty-cycle register
//! value the LED expects and writes it through a [`PwmDevice`].
//!
//! ## Duty mapping
//!
//! The LED is wired active-low, so the register value counts *off* time:
//!
//! | brightness | duty_cycle  |
//! |-----------:|------------:|
//! | 0 %        | 1 000 000   |
//! | 50 %       |   500 000   |
//! | 100 %      |         0   |
//!
//! Percentages are clamped to `[0, 100]` at this boundary; NaN is treated
//! as 0 (off). Every call writes, even if the value did not change.

use std::sync::{Mutex, PoisonError};

use log::{debug, info};

use crate::app::ports::PwmDevice;
use crate::error::{Error, Result};
use crate::pins;

/// Register value per brightness percent.
const DUTY_PER_PERCENT: f32 = 10_000.0;

/// LED color channel. The discriminant order is the table order (R, G, B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// sysfs PWM channel number.
    pub const fn index(self) -> u8 {
        match self {
            Self::Red => pins::PWM_CH_RED,
            Self::Green => pins::PWM_CH_GREEN,
            Self::Blue => pins::PWM_CH_BLUE,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|ch| ch.index() == index)
    }

    const fn slot(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// Clamp a brightness percentage to `[0, 100]`. NaN maps to 0.
pub fn clamp_percentage(percentage: f32) -> f32 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Duty-cycle register value for a brightness percentage.
pub fn duty_value(percentage: f32) -> u32 {
    ((100.0 - clamp_percentage(percentage)) * DUTY_PER_PERCENT).round() as u32
}

// ── Driver ────────────────────────────────────────────────────

pub struct PwmChannelDriver<D> {
    device: D,
    period: u32,
    // One lock per channel: foreground and worker writes never interleave.
    locks: [Mutex<()>; 3],
}

impl<D: PwmDevice> PwmChannelDriver<D> {
    pub fn new(device: D) -> Self {
        Self::with_period(device, pins::PWM_PERIOD)
    }

    pub fn with_period(device: D, period: u32) -> Self {
        Self {
            device,
            period,
            locks: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
        }
    }

    /// Export (if missing), enable, and set the period of every channel.
    /// Safe to run more than once.
    pub fn bootstrap(&self) -> Result<()> {
        for ch in Channel::ALL {
            let idx = ch.index();
            if self.device.is_exported(idx) {
                debug!("pwm{idx}: already exported");
            } else {
                self.device.export(idx)?;
            }
        }
        for ch in Channel::ALL {
            self.device.enable(ch.index())?;
        }
        for ch in Channel::ALL {
            self.device.set_period(ch.index(), self.period)?;
        }
        info!("pwm: channels 0-2 enabled, period={}", self.period);
        Ok(())
    }

    /// Set a channel's brightness in percent.
    pub fn set_duty_cycle(&self, channel: Channel, percentage: f32) -> Result<()> {
        let clamped = clamp_percentage(percentage);
        if clamped != percentage {
            debug!("pwm{}: clamped {percentage} to {clamped}", channel.index());
        }
        let value = duty_value(clamped);
        let _guard = self.locks[channel.slot()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.device.write_duty_cycle(channel.index(), value)
    }

    /// Borrow one channel as an `embedded-hal` PWM output.
    pub fn output(&self, channel: Channel) -> ChannelOutput<'_, D> {
        ChannelOutput {
            driver: self,
            channel,
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

// ── embedded-hal interop ──────────────────────────────────────

/// One LED channel exposed as [`embedded_hal::pwm::SetDutyCycle`], in
/// percent units (`max_duty_cycle() == 100`).
pub struct ChannelOutput<'a, D> {
    driver: &'a PwmChannelDriver<D>,
    channel: Channel,
}

impl embedded_hal::pwm::Error for Error {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

impl<D: PwmDevice> embedded_hal::pwm::ErrorType for ChannelOutput<'_, D> {
    type Error = Error;
}

impl<D: PwmDevice> embedded_hal::pwm::SetDutyCycle for ChannelOutput<'_, D> {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<()> {
        self.driver.set_duty_cycle(self.channel, f32::from(duty))
    }
}
