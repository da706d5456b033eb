//! Process launcher.
//!
//! Allocates the pipe a direction needs, wires the child's standard streams
//! to the pipe ends (or to the target file), and spawns the compression
//! program. The parent only ever gets back the ends it is allowed to use:
//!
//! ```text
//! decompress:  file ──► child ──stdout──► [pipe] ──► parent (read end)
//! compress:    parent (write end) ──► [pipe] ──stdin──► child ──stdout──► file
//! ```

use log::debug;
use oxigz_core::{Direction, OxiGzError, PipeConfig, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, PipeReader, PipeWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// The parent's side of a freshly spawned compression process.
#[derive(Debug)]
pub struct Launched {
    /// Write end of the input pipe (compress only).
    pub input: Option<PipeWriter>,
    /// Read end of the output pipe (decompress only).
    pub output: Option<PipeReader>,
    /// The spawned process.
    pub child: Child,
}

/// Build the argument vector for a direction.
///
/// Extra arguments from the configuration come first, then the mode flags:
///
/// - decompress: `-d -c -f -q <path>`
/// - compress: `-c -f -q` (output goes to the redirected stdout)
///
/// A relative path starting with `-` is passed as `./<path>` so the child
/// never mistakes it for an option or for standard input.
pub fn command_args(path: &Path, direction: Direction, config: &PipeConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = config.extra_args.iter().map(OsString::from).collect();
    match direction {
        Direction::Decompress => {
            args.extend(["-d", "-c", "-f", "-q"].map(OsString::from));
            args.push(operand(path).into_os_string());
        }
        Direction::Compress => {
            args.extend(["-c", "-f", "-q"].map(OsString::from));
        }
    }
    args
}

fn operand(path: &Path) -> PathBuf {
    if path.as_os_str().as_encoded_bytes().first() == Some(&b'-') {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

/// Open the compression target without truncating it.
///
/// Returns the file and whether this call created it.
fn open_target(path: &Path) -> io::Result<(File, bool)> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok((file, true)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Ok((OpenOptions::new().write(true).open(path)?, false))
        }
        Err(e) => Err(e),
    }
}

fn discard_created(path: &Path, created: bool) {
    if created {
        if let Err(e) = fs::remove_file(path) {
            debug!("could not remove {}: {e}", path.display());
        }
    }
}

/// Spawn the compression program for `path` in the given direction.
///
/// # Errors
///
/// - [`OxiGzError::Resource`] if the pipe cannot be allocated
/// - [`OxiGzError::Io`] if the compression target cannot be created
/// - [`OxiGzError::Spawn`] if the program cannot be started
///
/// Pipe ends and the target file are owned values, so every error path
/// releases whatever was already acquired. An existing compression target is
/// only truncated once the child is running; a target created for a failed
/// spawn is removed again.
pub fn launch(path: &Path, direction: Direction, config: &PipeConfig) -> Result<Launched> {
    let mut command = Command::new(&config.program);
    command
        .args(command_args(path, direction, config))
        .stderr(Stdio::inherit());

    let (input, output, target) = match direction {
        Direction::Decompress => {
            let (reader, writer) = io::pipe().map_err(OxiGzError::Resource)?;
            command.stdin(Stdio::null()).stdout(writer);
            (None, Some(reader), None)
        }
        Direction::Compress => {
            let (reader, writer) = io::pipe().map_err(OxiGzError::Resource)?;
            let (target, created) = open_target(path)?;
            let stdout = match target.try_clone() {
                Ok(stdout) => stdout,
                Err(e) => {
                    drop(target);
                    discard_created(path, created);
                    return Err(e.into());
                }
            };
            command.stdin(reader).stdout(stdout);
            (Some(writer), None, Some((target, created)))
        }
    };

    let spawned = command.spawn();

    // The command still holds the child's pipe ends; the parent must not.
    drop(command);

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            if let Some((target, created)) = target {
                drop(target);
                discard_created(path, created);
            }
            return Err(OxiGzError::spawn(&config.program, e));
        }
    };

    if let Some((target, _)) = target {
        if let Err(e) = target.set_len(0) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e.into());
        }
    }

    debug!(
        "spawned {} (pid {}) for {} of {}",
        config.program.display(),
        child.id(),
        direction,
        path.display()
    );

    Ok(Launched {
        input,
        output,
        child,
    })
}
