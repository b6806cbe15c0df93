//! ReachLED library.
//!
//! Drives the three-channel (R/G/B) PWM status LED of an embedded Linux
//! board through sysfs. The pattern engine in [`drivers`] only sees the
//! device through the port traits in [`app::ports`], so everything except
//! the thin sysfs adapters runs on the host in tests.
//!
//! ```text
//! PatternRunner ──▶ Renderer ──▶ PwmChannelDriver ──▶ PwmDevice (sysfs)
//!                      │
//!                      └──▶ ColorTable
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod color;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
