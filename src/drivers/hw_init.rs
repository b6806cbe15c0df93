//! One-shot LED peripheral initialization.
//!
//! Applies the pin-mux, then exports, enables, and sets the period of the
//! three PWM channels. Called once before the renderer is used; none of this
//! is on the render path.

use log::info;

use crate::adapters::pinmux::SysfsPinMux;
use crate::adapters::sysfs_pwm::SysfsPwm;
use crate::adapters::time::ThreadDelay;
use crate::app::ports::{PinMux, PwmDevice};
use crate::config::LedConfig;
use crate::drivers::pwm::PwmChannelDriver;
use crate::drivers::renderer::Renderer;
use crate::error::Result;

/// Set every pin in `pins` to `mode`.
pub fn apply_pinmux(mux: &dyn PinMux, pins: &[u32], mode: &str) -> Result<()> {
    for &pin in pins {
        mux.set_mode(pin, mode)?;
    }
    info!("hw_init: pins {pins:?} muxed to {mode}");
    Ok(())
}

/// Pin-mux (when `mux` is given), then bootstrap the PWM channels.
pub fn init_peripherals<D: PwmDevice>(
    driver: &PwmChannelDriver<D>,
    mux: Option<&dyn PinMux>,
    config: &LedConfig,
) -> Result<()> {
    if let Some(mux) = mux {
        apply_pinmux(mux, &config.pinmux_pins, &config.pinmux_mode)?;
    }
    driver.bootstrap()
}

/// Build a sysfs-backed renderer from `config` and initialize the hardware.
pub fn open_sysfs_led(config: &LedConfig) -> Result<Renderer<SysfsPwm, ThreadDelay>> {
    config.validate()?;
    let driver = PwmChannelDriver::with_period(SysfsPwm::new(&config.pwm_chip), config.period);
    let mux = config.pinmux_root.as_ref().map(SysfsPinMux::new);
    init_peripherals(&driver, mux.as_ref().map(|m| m as &dyn PinMux), config)?;
    info!("hw_init: LED ready on {}", config.pwm_chip.display());
    let colors = config.color_table()?;
    Ok(Renderer::new(driver, colors, ThreadDelay).with_pulse_steps(config.pulse_steps))
}
