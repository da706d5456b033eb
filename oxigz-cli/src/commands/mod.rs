//! Command implementations for the OxiGz CLI.

pub mod file;
pub mod stream;

pub use file::cmd_file;
pub use stream::cmd_stream;

use crate::args::Cli;
use crate::utils::is_broken_pipe;
use std::fmt;
use std::path::Path;

/// Boxed error used by command functions.
pub type CmdResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Some files failed; each failure has already been reported on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesFailed {
    /// Number of files that failed.
    pub failed: usize,
    /// Number of files attempted.
    pub total: usize,
}

impl fmt::Display for FilesFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} files failed", self.failed, self.total)
    }
}

impl std::error::Error for FilesFailed {}

/// Run the command described by `cli`.
///
/// Every file is attempted even if an earlier one fails; the run then ends
/// with [`FilesFailed`]. A broken pipe on standard output stops the run at
/// once.
pub fn run(cli: &Cli) -> CmdResult<()> {
    if cli.files.is_empty() {
        return cmd_stream(cli, None);
    }

    let mut failed = 0usize;
    for path in &cli.files {
        let result = if path == Path::new("-") {
            cmd_stream(cli, None)
        } else if cli.to_stdout {
            cmd_stream(cli, Some(path))
        } else {
            cmd_file(cli, path)
        };

        if let Err(e) = result {
            if is_broken_pipe(e.as_ref()) {
                return Err(e);
            }
            eprintln!("oxigz: {}: {}", path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Box::new(FilesFailed {
            failed,
            total: cli.files.len(),
        }));
    }
    Ok(())
}
