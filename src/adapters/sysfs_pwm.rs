//! sysfs PWM adapter.
//!
//! Implements [`PwmDevice`] against the Linux PWM class interface:
//!
//! ```text
//! <chip>/export               write "<N>" to create pwm<N>/
//! <chip>/pwm<N>/enable        "1"
//! <chip>/pwm<N>/period        period in ns
//! <chip>/pwm<N>/duty_cycle    duty register value
//! ```
//!
//! Each call opens, writes, and closes the node. Nothing is cached.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::PwmDevice;
use crate::error::{Error, Result};
use crate::pins;

pub struct SysfsPwm {
    chip: PathBuf,
}

impl SysfsPwm {
    pub fn new(chip: impl Into<PathBuf>) -> Self {
        Self { chip: chip.into() }
    }

    pub fn chip(&self) -> &Path {
        &self.chip
    }

    fn channel_dir(&self, channel: u8) -> PathBuf {
        self.chip.join(format!("pwm{channel}"))
    }

    fn write_node(path: PathBuf, value: impl AsRef<[u8]>) -> Result<()> {
        fs::write(&path, value).map_err(|e| Error::device(path, e))
    }
}

impl Default for SysfsPwm {
    fn default() -> Self {
        Self::new(pins::PWM_CHIP_PATH)
    }
}

impl PwmDevice for SysfsPwm {
    fn is_exported(&self, channel: u8) -> bool {
        self.channel_dir(channel).exists()
    }

    fn export(&self, channel: u8) -> Result<()> {
        Self::write_node(self.chip.join("export"), channel.to_string())?;
        info!("pwm{channel}: exported under {}", self.chip.display());
        Ok(())
    }

    fn enable(&self, channel: u8) -> Result<()> {
        Self::write_node(self.channel_dir(channel).join("enable"), "1")
    }

    fn set_period(&self, channel: u8, period: u32) -> Result<()> {
        Self::write_node(self.channel_dir(channel).join("period"), period.to_string())
    }

    fn write_duty_cycle(&self, channel: u8, value: u32) -> Result<()> {
        Self::write_node(
            self.channel_dir(channel).join("duty_cycle"),
            value.to_string(),
        )
    }
}
