//! Utility functions for the CLI.

use filetime::FileTime;
use log::LevelFilter;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended on compression.
pub const GZ_SUFFIX: &str = ".gz";

/// Install the logger. Repeated calls are ignored.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "oxigz: {}", record.args()));
    // Already installed when called more than once in-process.
    let _ = builder.try_init();
}

/// Output path for compressing `input`, or `None` if it already ends in `.gz`.
pub fn compressed_name(input: &Path) -> Option<PathBuf> {
    if has_gz_suffix(input) {
        return None;
    }
    let mut name = OsString::from(input.as_os_str());
    name.push(GZ_SUFFIX);
    Some(PathBuf::from(name))
}

/// Output path for decompressing `input`, or `None` for an unknown suffix.
///
/// `name.gz` becomes `name`, `name.tgz` becomes `name.tar`.
pub fn decompressed_name(input: &Path) -> Option<PathBuf> {
    let file_name = input.file_name()?.to_str()?;
    let lower = file_name.to_ascii_lowercase();
    let stem = if lower.ends_with(".tgz") {
        format!("{}.tar", &file_name[..file_name.len() - 4])
    } else if lower.ends_with(GZ_SUFFIX) {
        file_name[..file_name.len() - GZ_SUFFIX.len()].to_string()
    } else {
        return None;
    };
    if stem.is_empty() {
        return None;
    }
    Some(input.with_file_name(stem))
}

fn has_gz_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            let lower = n.to_ascii_lowercase();
            lower.ends_with(GZ_SUFFIX) || lower.ends_with(".tgz")
        })
        .unwrap_or(false)
}

/// Copy access and modification times from `from` to `to`.
pub fn copy_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = std::fs::metadata(from)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime)
}

/// Returns true for a broken pipe anywhere in an error chain.
pub fn is_broken_pipe(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
        current = e.source();
    }
    false
}
