//! Output mode types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest supported discrete level count.
pub const MAX_LEVELS: u32 = 256;

/// How grayscale cells are reduced before post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOutputMode", into = "String")]
pub enum OutputMode {
    /// Continuous values, no quantization.
    Full,
    /// 1-bit output. Uses the threshold unless dithering.
    Binary,
    /// N evenly spaced levels, N >= 2.
    Levels(u32),
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Levels(8)
    }
}

impl OutputMode {
    /// Maps a level count onto a mode: 1 is binary, anything above is N-level.
    pub fn from_levels(levels: u32) -> Option<Self> {
        match levels {
            0 => None,
            1 => Some(OutputMode::Binary),
            n => Some(OutputMode::Levels(n.min(MAX_LEVELS))),
        }
    }

    /// Parses a mode, falling back to the default for anything unrecognised.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("full") {
            return Ok(OutputMode::Full);
        }
        s.parse::<u32>()
            .ok()
            .and_then(OutputMode::from_levels)
            .ok_or_else(|| format!("invalid output mode '{s}'"))
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Full => f.write_str("full"),
            OutputMode::Binary => f.write_str("1"),
            OutputMode::Levels(n) => write!(f, "{n}"),
        }
    }
}

impl From<OutputMode> for String {
    fn from(mode: OutputMode) -> Self {
        mode.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOutputMode {
    Number(u32),
    Text(String),
}

impl TryFrom<RawOutputMode> for OutputMode {
    type Error = String;

    fn try_from(raw: RawOutputMode) -> Result<Self, Self::Error> {
        match raw {
            RawOutputMode::Number(n) => {
                OutputMode::from_levels(n).ok_or_else(|| format!("invalid output mode {n}"))
            }
            RawOutputMode::Text(s) => s.parse(),
        }
    }
}
