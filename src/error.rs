//! Unified error type for the LED engine.
//!
//! Every fallible operation (device writes, color lookups, pattern parsing,
//! worker spawn) funnels into [`Error`], so the pattern runner and the CLI
//! handle failures uniformly.

use core::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// The name is not a key of the color table.
    UnknownColor(String),
    /// A sysfs write failed (channel not exported, permissions, ...).
    DeviceIo { path: PathBuf, source: io::Error },
    /// The pattern string is empty or has an empty segment.
    InvalidPattern(&'static str),
    /// A color table entry has an intensity outside `[0, 1]`.
    InvalidColor(String),
    /// Configuration failed validation.
    Config(&'static str),
    /// The background worker thread could not be spawned.
    TaskSpawn(io::Error),
}

impl Error {
    pub(crate) fn device(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DeviceIo {
            path: path.into(),
            source,
        }
    }

    /// `true` for failures that came from the hardware rather than the caller.
    pub fn is_device(&self) -> bool {
        matches!(self, Self::DeviceIo { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColor(name) => write!(f, "unknown color '{name}'"),
            Self::DeviceIo { path, source } => {
                write!(f, "device write to {} failed: {source}", path.display())
            }
            Self::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
            Self::InvalidColor(name) => {
                write!(f, "color '{name}' has an intensity outside [0, 1]")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::TaskSpawn(e) => write!(f, "pattern worker spawn failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DeviceIo { source, .. } | Self::TaskSpawn(source) => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
