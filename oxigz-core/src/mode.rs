//! Open modes and transfer direction.

use crate::error::{OxiGzError, Result};
use std::fmt;
use std::str::FromStr;

/// Which way data flows through the compression process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Child reads the target file and streams plain text back to the parent.
    Decompress,
    /// Parent streams plain text to the child, which writes the target file.
    Compress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decompress => write!(f, "decompression"),
            Direction::Compress => write!(f, "compression"),
        }
    }
}

/// A validated open mode.
///
/// Only the two text modes are accepted:
///
/// | Mode   | Direction                 |
/// |--------|---------------------------|
/// | `"rt"` | [`Direction::Decompress`] |
/// | `"wt"` | [`Direction::Compress`]   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read text (`"rt"`).
    ReadText,
    /// Write text (`"wt"`).
    WriteText,
}

impl OpenMode {
    /// Parse a mode string.
    pub fn parse(mode: &str) -> Result<Self> {
        match mode {
            "rt" => Ok(OpenMode::ReadText),
            "wt" => Ok(OpenMode::WriteText),
            other => Err(OxiGzError::invalid_mode(other)),
        }
    }

    /// The direction implied by this mode.
    pub fn direction(self) -> Direction {
        match self {
            OpenMode::ReadText => Direction::Decompress,
            OpenMode::WriteText => Direction::Compress,
        }
    }

    /// The canonical mode string.
    pub fn as_str(self) -> &'static str {
        match self {
            OpenMode::ReadText => "rt",
            OpenMode::WriteText => "wt",
        }
    }
}

impl FromStr for OpenMode {
    type Err = OxiGzError;

    fn from_str(s: &str) -> Result<Self> {
        OpenMode::parse(s)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
