//! Pipe handle lifecycle.
//!
//! A [`GzPipe`] starts closed, is opened exactly once, and is closed exactly
//! once. Closing releases the parent's pipe ends before reaping the child so
//! a compressing child always sees end-of-input.

use crate::launcher::{Launched, launch};
use log::{debug, warn};
use oxigz_core::{Direction, OpenMode, OxiGzError, PipeConfig, Result};
use std::io::{BufReader, PipeReader, PipeWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

/// How often `close` polls a child when a wait deadline is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Observable lifecycle state of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Created but never opened.
    Closed,
    /// Child running, pipes wired.
    Opened,
    /// Torn down after use. Cannot be reopened.
    Finished,
}

/// Resources owned while a handle is open.
#[derive(Debug)]
struct Session {
    input: Option<PipeWriter>,
    output: Option<PipeReader>,
    cursor: Option<BufReader<PipeReader>>,
    child: Child,
}

#[derive(Debug)]
enum State {
    Closed,
    Opened(Session),
    Finished,
}

/// A file-like handle over a compression subprocess.
///
/// Opened in `"rt"` mode the child decompresses the target file and the
/// handle reads plain text; in `"wt"` mode the handle writes plain text and
/// the child compresses it into the target file.
///
/// # Example
///
/// ```rust,no_run
/// use oxigz_pipe::GzPipe;
///
/// let mut out = GzPipe::new("notes.gz", "wt", 32 * 1024)?;
/// out.open()?;
/// out.write_str("first line\nsecond line\n")?;
/// out.close()?;
///
/// let mut input = GzPipe::new("notes.gz", "rt", 32 * 1024)?;
/// input.open()?;
/// for line in input.lines()? {
///     print!("{}", line?);
/// }
/// input.close()?;
/// # Ok::<(), oxigz_core::OxiGzError>(())
/// ```
///
/// Dropping an open handle closes it.
#[derive(Debug)]
pub struct GzPipe {
    path: PathBuf,
    direction: Direction,
    config: PipeConfig,
    state: State,
    exit_status: Option<ExitStatus>,
}

impl GzPipe {
    /// Create a closed handle with the default program and a buffer size.
    pub fn new(path: impl AsRef<Path>, mode: &str, buffer_size: usize) -> Result<Self> {
        Self::with_config(
            path,
            mode,
            PipeConfig::default().with_buffer_size(buffer_size),
        )
    }

    /// Create a closed handle with a full configuration.
    pub fn with_config(path: impl AsRef<Path>, mode: &str, config: PipeConfig) -> Result<Self> {
        let mode: OpenMode = mode.parse()?;
        config.validate()?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            direction: mode.direction(),
            config,
            state: State::Closed,
            exit_status: None,
        })
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transfer direction fixed at construction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Buffer size used for reads and write chunks.
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    /// Configuration used to launch the child.
    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HandleState {
        match self.state {
            State::Closed => HandleState::Closed,
            State::Opened(_) => HandleState::Opened,
            State::Finished => HandleState::Finished,
        }
    }

    /// Returns true while the child is wired up.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Opened(_))
    }

    /// Process id of the child while open.
    pub fn id(&self) -> Option<u32> {
        match &self.state {
            State::Opened(session) => Some(session.child.id()),
            _ => None,
        }
    }

    /// Exit status of the child, available once the handle is closed.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Spawn the child and wire up the pipes.
    ///
    /// A failed open leaves the handle closed.
    pub fn open(&mut self) -> Result<&mut Self> {
        match self.state {
            State::Opened(_) => return Err(OxiGzError::AlreadyOpen),
            State::Finished => return Err(OxiGzError::AlreadyClosed),
            State::Closed => {}
        }

        let Launched {
            input,
            output,
            child,
        } = launch(&self.path, self.direction, &self.config)?;

        self.state = State::Opened(Session {
            input,
            output,
            cursor: None,
            child,
        });
        Ok(self)
    }

    /// Tear down the pipes and reap the child.
    ///
    /// Returns the child's exit status. A non-zero status is reported, not
    /// raised; see [`GzPipe::finish`] for the strict variant. Closing a
    /// handle that is not open logs a warning and returns `Ok(None)`.
    ///
    /// With a configured wait deadline, a child that outlives it is killed
    /// and reaped, the handle is still torn down, and
    /// [`OxiGzError::WaitTimeout`] is returned.
    pub fn close(&mut self) -> Result<Option<ExitStatus>> {
        let State::Opened(session) = &mut self.state else {
            warn!(
                "close() called on {} handle that is not open: {}",
                self.direction,
                self.path.display()
            );
            return Ok(None);
        };

        // End-of-input for a compressing child, then our read side.
        session.input = None;
        session.output = None;
        session.cursor = None;

        // The handle stays open until the child is reaped, so a failed wait
        // can be retried by another close (or by drop).
        let (status, timed_out) = reap(&mut session.child, self.config.wait_timeout)?;
        let pid = session.child.id();
        self.state = State::Finished;
        self.exit_status = Some(status);
        debug!("reaped pid {} for {}: {}", pid, self.path.display(), status);

        match self.config.wait_timeout {
            Some(timeout) if timed_out => Err(OxiGzError::WaitTimeout { timeout }),
            _ => Ok(Some(status)),
        }
    }

    /// Close the handle and fail if the child did not exit successfully.
    pub fn finish(&mut self) -> Result<ExitStatus> {
        match self.close()? {
            Some(status) if status.success() => Ok(status),
            Some(status) => Err(OxiGzError::ChildFailed {
                code: status.code(),
            }),
            None => Err(OxiGzError::NotOpened),
        }
    }

    /// Forcibly terminate the child. The next [`close`](Self::close) reaps it.
    pub fn kill(&mut self) -> Result<()> {
        match &mut self.state {
            State::Opened(session) => {
                warn!(
                    "killing pid {} for {}",
                    session.child.id(),
                    self.path.display()
                );
                session.child.kill()?;
                Ok(())
            }
            _ => Err(OxiGzError::NotOpened),
        }
    }

    fn session_for(&mut self, wanted: Direction, operation: &'static str) -> Result<&mut Session> {
        let State::Opened(session) = &mut self.state else {
            return Err(OxiGzError::NotOpened);
        };
        if self.direction != wanted {
            return Err(OxiGzError::wrong_direction(self.direction, operation));
        }
        Ok(session)
    }

    /// Readable side of an open decompressing handle.
    ///
    /// Goes through the line cursor once it exists so buffered data is not
    /// skipped.
    pub(crate) fn source(&mut self, operation: &'static str) -> Result<&mut dyn Read> {
        let session = self.session_for(Direction::Decompress, operation)?;
        if let Some(cursor) = session.cursor.as_mut() {
            return Ok(cursor);
        }
        match session.output.as_mut() {
            Some(reader) => Ok(reader),
            None => Err(OxiGzError::NotOpened),
        }
    }

    /// Writable side of an open compressing handle.
    pub(crate) fn sink(&mut self, operation: &'static str) -> Result<&mut dyn Write> {
        let session = self.session_for(Direction::Compress, operation)?;
        match session.input.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(OxiGzError::NotOpened),
        }
    }

    /// Line cursor over the output pipe, created on first use.
    pub(crate) fn cursor(&mut self, operation: &'static str) -> Result<&mut BufReader<PipeReader>> {
        let capacity = self.config.buffer_size;
        let session = self.session_for(Direction::Decompress, operation)?;
        if session.cursor.is_none() {
            let reader = session.output.take().ok_or(OxiGzError::NotOpened)?;
            session.cursor = Some(BufReader::with_capacity(capacity, reader));
            debug!("line cursor created with capacity {capacity}");
        }
        session.cursor.as_mut().ok_or(OxiGzError::NotOpened)
    }
}

impl Drop for GzPipe {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(e) = self.close() {
                warn!("failed to close {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Wait for the child, killing it if it outlives `timeout`.
///
/// Returns the exit status and whether the deadline expired.
fn reap(child: &mut Child, timeout: Option<Duration>) -> Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait()?, false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        let now = Instant::now();
        if now >= deadline {
            warn!(
                "pid {} still running after {:?}, killing it",
                child.id(),
                timeout
            );
            // It may have exited since the last poll.
            if let Err(e) = child.kill() {
                debug!("kill failed: {e}");
            }
            return Ok((child.wait()?, true));
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_program() -> PipeConfig {
        PipeConfig::new().with_program("/nonexistent/oxigz-missing")
    }

    #[test]
    fn test_invalid_mode() {
        for mode in ["r", "rb", "wb", "a"] {
            let err = GzPipe::new("x.gz", mode, 1024).unwrap_err();
            assert!(matches!(err, OxiGzError::InvalidMode { .. }));
        }
    }

    #[test]
    fn test_zero_buffer_size() {
        let err = GzPipe::new("x.gz", "rt", 0).unwrap_err();
        assert!(matches!(err, OxiGzError::InvalidConfig { .. }));
    }

    #[test]
    fn test_new_handle_is_closed() {
        let pipe = GzPipe::new("x.gz", "wt", 1024).unwrap();
        assert_eq!(pipe.state(), HandleState::Closed);
        assert_eq!(pipe.direction(), Direction::Compress);
        assert_eq!(pipe.buffer_size(), 1024);
        assert!(!pipe.is_open());
        assert!(pipe.id().is_none());
        assert!(pipe.exit_status().is_none());
    }

    #[test]
    fn test_close_never_opened() {
        let mut pipe = GzPipe::new("x.gz", "rt", 1024).unwrap();
        assert!(pipe.close().unwrap().is_none());
        assert!(pipe.close().unwrap().is_none());
        assert_eq!(pipe.state(), HandleState::Closed);
    }

    #[test]
    fn test_failed_open_stays_closed() {
        let mut pipe = GzPipe::with_config("x.gz", "rt", missing_program()).unwrap();
        let err = pipe.open().unwrap_err();
        assert!(matches!(err, OxiGzError::Spawn { .. }));
        assert_eq!(pipe.state(), HandleState::Closed);
    }

    #[test]
    fn test_failed_open_keeps_existing_target() {
        let path = std::env::temp_dir().join(format!("oxigz_handle_keep_{}.gz", std::process::id()));
        std::fs::write(&path, b"precious existing content").unwrap();

        let mut pipe = GzPipe::with_config(&path, "wt", missing_program()).unwrap();
        assert!(matches!(pipe.open(), Err(OxiGzError::Spawn { .. })));
        assert_eq!(pipe.state(), HandleState::Closed);
        assert_eq!(std::fs::read(&path).unwrap(), b"precious existing content");

        let _ = std::fs::remove_file(&path);
    }

    /// A session whose pipes are already gone, as left behind by a close
    /// whose wait failed, is still closed by the next call.
    #[cfg(unix)]
    #[test]
    fn test_close_resumes_partial_teardown() {
        let child = std::process::Command::new("/bin/sh")
            .args(["-c", "exit 3"])
            .spawn()
            .unwrap();
        let mut pipe = GzPipe::new("x.gz", "wt", 1024).unwrap();
        pipe.state = State::Opened(Session {
            input: None,
            output: None,
            cursor: None,
            child,
        });

        assert!(pipe.is_open());
        let status = pipe.close().unwrap().expect("session was open");
        assert_eq!(status.code(), Some(3));
        assert_eq!(pipe.state(), HandleState::Finished);
        assert!(pipe.close().unwrap().is_none());
    }

    #[test]
    fn test_finish_never_opened() {
        let mut pipe = GzPipe::new("x.gz", "rt", 1024).unwrap();
        assert!(matches!(pipe.finish(), Err(OxiGzError::NotOpened)));
    }

    #[test]
    fn test_kill_never_opened() {
        let mut pipe = GzPipe::new("x.gz", "rt", 1024).unwrap();
        assert!(matches!(pipe.kill(), Err(OxiGzError::NotOpened)));
    }
}
