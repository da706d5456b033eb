//! # OxiGz Pipe
//!
//! A streaming, file-like handle over a gzip-compatible compression process.
//!
//! The compression itself happens in a child process (by default the
//! `oxigz` executable, any pigz/gzip-compatible program works). This crate
//! owns the process lifecycle and pipe plumbing:
//!
//! - [`launcher`]: pipe allocation, stream redirection and spawning
//! - [`handle`]: the open/close state machine ([`GzPipe`])
//! - [`stream`]: reads, writes and line iteration on an open handle
//!
//! ## Example
//!
//! ```rust,no_run
//! // Compress text into a file
//! let mut out = oxigz_pipe::open("log.txt.gz", "wt")?;
//! out.write_str("Hello, World!\nThis is a test\n")?;
//! out.close()?;
//!
//! // Read it back line by line
//! let mut input = oxigz_pipe::open("log.txt.gz", "rt")?;
//! let lines: Vec<String> = input.lines()?.collect::<Result<_, _>>()?;
//! assert_eq!(lines, ["Hello, World!\n", "This is a test\n"]);
//! input.close()?;
//! # Ok::<(), oxigz_core::OxiGzError>(())
//! ```
//!
//! ## Modes
//!
//! | Mode   | Parent   | Child                              |
//! |--------|----------|------------------------------------|
//! | `"rt"` | reads    | decompresses the file to its stdout |
//! | `"wt"` | writes   | compresses its stdin into the file |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod handle;
pub mod launcher;
pub mod stream;

// Re-exports
pub use handle::{GzPipe, HandleState};
pub use launcher::{Launched, command_args, launch};
pub use oxigz_core::{Direction, OpenMode, OxiGzError, PipeConfig, Result};
pub use stream::Lines;

use std::path::Path;

/// Open a handle using configuration from the `OXIGZ_*` environment.
pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<GzPipe> {
    open_with(path, mode, PipeConfig::from_env()?)
}

/// Open a handle with an explicit configuration.
pub fn open_with(path: impl AsRef<Path>, mode: &str, config: PipeConfig) -> Result<GzPipe> {
    let mut pipe = GzPipe::with_config(path, mode, config)?;
    pipe.open()?;
    Ok(pipe)
}
