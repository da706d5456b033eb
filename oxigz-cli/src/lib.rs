//! OxiGz CLI - parallel gzip compression.
//!
//! The `oxigz` executable understands the pigz/gzip flags a pipe handle
//! relies on (`-d`, `-c`, `-f`, `-q`, `-k`) and compresses with a pool of
//! worker threads. [`call`] is the whole program as a function from an
//! argument vector to an exit code, so the binary is a one-line wrapper.

pub mod args;
pub mod codec;
pub mod commands;
pub mod utils;

pub use args::Cli;
pub use codec::{CodecOptions, CodecStats};

use clap::Parser;
use commands::FilesFailed;
use std::ffi::OsString;
use utils::{init_logging, is_broken_pipe};

/// Exit code for success.
pub const EXIT_OK: i32 = 0;

/// Exit code for a failed operation.
pub const EXIT_ERROR: i32 = 1;

/// Run `oxigz` with an argument vector (the first element is the program
/// name) and return its exit code.
///
/// Usage errors return clap's exit code (2); `--help` and `--version`
/// return 0.
pub fn call<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match commands::run(&cli) {
        Ok(()) => EXIT_OK,
        // The reader went away; nothing useful left to report.
        Err(e) if is_broken_pipe(e.as_ref()) => EXIT_ERROR,
        Err(e) if e.is::<FilesFailed>() => EXIT_ERROR,
        Err(e) => {
            eprintln!("oxigz: {}", e);
            EXIT_ERROR
        }
    }
}
