//! debugfs pin-mux adapter (Intel Edison layout).
//!
//! Writes the mode name to `<root>/gpio<pin>/current_pinmux`.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::app::ports::PinMux;
use crate::error::{Error, Result};
use crate::pins;

pub struct SysfsPinMux {
    root: PathBuf,
}

impl SysfsPinMux {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsPinMux {
    fn default() -> Self {
        Self::new(pins::PINMUX_ROOT)
    }
}

impl PinMux for SysfsPinMux {
    fn set_mode(&self, pin: u32, mode: &str) -> Result<()> {
        let path = self.root.join(format!("gpio{pin}")).join("current_pinmux");
        fs::write(&path, mode).map_err(|e| Error::device(&path, e))?;
        debug!("gpio{pin}: pinmux {mode}");
        Ok(())
    }
}
