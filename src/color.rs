//! Named color table.
//!
//! Maps a color name to a normalized intensity triple, one value per PWM
//! channel in R, G, B order. The table is built once and never mutated;
//! extending it is a configuration change (see
//! [`LedConfig::extra_colors`](crate::config::LedConfig::extra_colors)).

use serde::{Deserialize, Serialize};

use crate::drivers::pwm::Channel;
use crate::error::{Error, Result};

/// Intensity triple, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Intensity of one channel.
    pub fn intensity(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// `true` if every component lies in `[0, 1]` (NaN fails).
    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

// ── Builtin colors ────────────────────────────────────────────

pub const BUILTIN_COLORS: [(&str, Color); 10] = [
    ("off", Color::new(0.0, 0.0, 0.0)),
    ("red", Color::new(1.0, 0.0, 0.0)),
    ("green", Color::new(0.0, 1.0, 0.0)),
    ("blue", Color::new(0.0, 0.0, 1.0)),
    ("white", Color::new(1.0, 1.0, 1.0)),
    ("yellow", Color::new(1.0, 1.0, 0.0)),
    ("cyan", Color::new(0.0, 1.0, 1.0)),
    ("magenta", Color::new(1.0, 0.0, 1.0)),
    ("orange", Color::new(1.0, 0.4, 0.0)),
    ("weakred", Color::new(0.1, 0.0, 0.0)),
];

/// Immutable name → [`Color`] mapping. Lookup is an exact, case-sensitive
/// match; iteration order is insertion order.
#[derive(Debug, Clone)]
pub struct ColorTable {
    entries: Vec<(String, Color)>,
}

impl ColorTable {
    /// The ten builtin colors.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_COLORS
                .iter()
                .map(|(name, color)| ((*name).to_owned(), *color))
                .collect(),
        }
    }

    /// Builtin colors plus `extra`. An extra entry with a builtin name
    /// replaces the builtin value in place.
    pub fn with_extra<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        let mut table = Self::builtin();
        for (name, color) in extra {
            let name = name.into();
            if name.is_empty() || name.contains(',') {
                return Err(Error::InvalidColor(name));
            }
            if !color.is_valid() {
                return Err(Error::InvalidColor(name));
            }
            match table.entries.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = color,
                None => table.entries.push((name, color)),
            }
        }
        Ok(table)
    }

    pub fn lookup(&self, name: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::builtin()
    }
}
