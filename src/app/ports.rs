//! Port traits: the boundary between the LED engine and the device.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PwmChannelDriver / Renderer (domain)
//! ```
//!
//! Adapters (sysfs PWM, debugfs pin-mux, thread sleep) implement these
//! traits. The drivers consume them via generics, so the engine never touches
//! the filesystem directly and every layer is testable on the host.
//!
//! All methods take `&self`: the renderer is shared between the foreground
//! controller and the pattern worker thread, so implementations must be
//! `Send + Sync` and do their own interior synchronization if they need any.

use std::time::Duration;

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// PWM device port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only PWM control surface with one node set per channel.
pub trait PwmDevice: Send + Sync {
    /// Whether `pwm<channel>` is already exported.
    fn is_exported(&self, channel: u8) -> bool;

    /// Export `channel` so its control nodes appear.
    fn export(&self, channel: u8) -> Result<()>;

    /// Enable the channel output.
    fn enable(&self, channel: u8) -> Result<()>;

    /// Set the channel period (device time units).
    fn set_period(&self, channel: u8, period: u32) -> Result<()>;

    /// Write the raw duty-cycle register value.
    fn write_duty_cycle(&self, channel: u8, value: u32) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Pin-mux port (bootstrap only)
// ───────────────────────────────────────────────────────────────

/// Selects which hardware function a physical pin exposes.
pub trait PinMux {
    fn set_mode(&self, pin: u32, mode: &str) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Delay port
// ───────────────────────────────────────────────────────────────

/// Blocking sleep used between render steps.
pub trait Delay: Send + Sync {
    fn delay(&self, duration: Duration);
}

impl<D: PwmDevice + ?Sized> PwmDevice for std::sync::Arc<D> {
    fn is_exported(&self, channel: u8) -> bool {
        (**self).is_exported(channel)
    }

    fn export(&self, channel: u8) -> Result<()> {
        (**self).export(channel)
    }

    fn enable(&self, channel: u8) -> Result<()> {
        (**self).enable(channel)
    }

    fn set_period(&self, channel: u8, period: u32) -> Result<()> {
        (**self).set_period(channel, period)
    }

    fn write_duty_cycle(&self, channel: u8, value: u32) -> Result<()> {
        (**self).write_duty_cycle(channel, value)
    }
}

impl<T: Delay + ?Sized> Delay for std::sync::Arc<T> {
    fn delay(&self, duration: Duration) {
        (**self).delay(duration);
    }
}
