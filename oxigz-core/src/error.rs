//! Error types for OxiGz operations.
//!
//! Every failure a pipe handle can report is a variant of [`OxiGzError`]:
//! configuration mistakes, OS resource exhaustion, spawn failures, lifecycle
//! misuse, and data-integrity problems such as short writes.

use crate::mode::Direction;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for OxiGz operations.
#[derive(Debug, Error)]
pub enum OxiGzError {
    /// I/O error from an underlying file or pipe.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Open mode string is not one of the accepted text modes.
    #[error("Invalid open mode {mode:?}: expected \"rt\" or \"wt\"")]
    InvalidMode {
        /// The rejected mode string.
        mode: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Pipe creation failed.
    #[error("Failed to allocate pipe: {0}")]
    Resource(#[source] io::Error),

    /// The compression process could not be started.
    #[error("Failed to spawn {}: {source}", .program.display())]
    Spawn {
        /// Program that was being started.
        program: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// `open` called on a handle that is already open.
    #[error("Handle is already open")]
    AlreadyOpen,

    /// `open` called on a handle that has already been closed.
    #[error("Handle has already been closed and cannot be reopened")]
    AlreadyClosed,

    /// Stream operation attempted on a handle that is not open.
    #[error("Handle is not open")]
    NotOpened,

    /// Stream operation does not match the handle's direction.
    #[error("Cannot {operation} a handle opened for {direction}")]
    WrongDirection {
        /// Direction the handle was created with.
        direction: Direction,
        /// The attempted operation.
        operation: &'static str,
    },

    /// Fewer bytes reached the child than were requested.
    #[error("Partial write: wrote {written} of {expected} bytes")]
    PartialWrite {
        /// Number of bytes actually written.
        written: usize,
        /// Number of bytes requested.
        expected: usize,
    },

    /// The child did not exit before the configured deadline and was killed.
    #[error("Compression process did not exit within {timeout:?} and was killed")]
    WaitTimeout {
        /// The deadline that expired.
        timeout: Duration,
    },

    /// The child exited unsuccessfully.
    #[error("Compression process failed with exit code {code:?}")]
    ChildFailed {
        /// Exit code, or `None` if the process was terminated by a signal.
        code: Option<i32>,
    },

    /// Decompressed output was not valid UTF-8 text.
    #[error("Decompressed data is not valid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        valid_up_to: usize,
    },
}

/// Result type alias for OxiGz operations.
pub type Result<T> = std::result::Result<T, OxiGzError>;

impl OxiGzError {
    /// Create an invalid mode error.
    pub fn invalid_mode(mode: impl Into<String>) -> Self {
        Self::InvalidMode { mode: mode.into() }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a spawn error.
    pub fn spawn(program: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a wrong direction error.
    pub fn wrong_direction(direction: Direction, operation: &'static str) -> Self {
        Self::WrongDirection {
            direction,
            operation,
        }
    }

    /// Create a partial write error.
    pub fn partial_write(written: usize, expected: usize) -> Self {
        Self::PartialWrite { written, expected }
    }

    /// Returns true for errors caused by misuse of the handle lifecycle.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyOpen | Self::AlreadyClosed | Self::NotOpened | Self::WrongDirection { .. }
        )
    }
}

impl From<OxiGzError> for io::Error {
    fn from(err: OxiGzError) -> Self {
        match err {
            OxiGzError::Io(e) | OxiGzError::Resource(e) => e,
            OxiGzError::PartialWrite { .. } => io::Error::new(io::ErrorKind::WriteZero, err),
            OxiGzError::InvalidUtf8 { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            OxiGzError::WaitTimeout { .. } => io::Error::new(io::ErrorKind::TimedOut, err),
            OxiGzError::InvalidMode { .. } | OxiGzError::InvalidConfig { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other if other.is_usage_error() => io::Error::new(io::ErrorKind::InvalidInput, other),
            other => io::Error::other(other),
        }
    }
}
