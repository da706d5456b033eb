//! # OxiGz Core
//!
//! Core components shared by the OxiGz crates.
//!
//! - [`error`]: Error types
//! - [`mode`]: Open modes (`"rt"`, `"wt"`) and transfer direction
//! - [`config`]: Pipe handle configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ oxigz-cli: `oxigz` entry point (parallel gzip codec)    │
//! ├─────────────────────────────────────────────────────────┤
//! │ oxigz-pipe: launcher, lifecycle, stream adapter         │
//! ├─────────────────────────────────────────────────────────┤
//! │ oxigz-core (this crate): errors, modes, config          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxigz_core::{Direction, OpenMode, PipeConfig};
//!
//! let mode = OpenMode::parse("wt").unwrap();
//! assert_eq!(mode.direction(), Direction::Compress);
//!
//! let config = PipeConfig::new().with_buffer_size(4096);
//! assert!(config.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod mode;

// Re-exports for convenience
pub use config::{DEFAULT_BUFFER_SIZE, DEFAULT_PROGRAM, PipeConfig};
pub use error::{OxiGzError, Result};
pub use mode::{Direction, OpenMode};
