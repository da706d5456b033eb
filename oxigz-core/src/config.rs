//! Configuration for pipe handles.

use crate::error::{OxiGzError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default program started for compression and decompression.
pub const DEFAULT_PROGRAM: &str = "oxigz";

/// Default buffer size for bulk reads and chunked writes (32KB).
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Environment variable overriding [`PipeConfig::program`].
pub const ENV_PROGRAM: &str = "OXIGZ_PROGRAM";

/// Environment variable overriding [`PipeConfig::buffer_size`].
pub const ENV_BUFFER_SIZE: &str = "OXIGZ_BUFFER_SIZE";

/// Environment variable setting [`PipeConfig::wait_timeout`] in milliseconds.
pub const ENV_WAIT_TIMEOUT_MS: &str = "OXIGZ_WAIT_TIMEOUT_MS";

/// Settings shared by every handle opened with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeConfig {
    /// Compression program, resolved through `PATH` when not a path.
    pub program: PathBuf,
    /// Arguments passed to the program ahead of the mode flags.
    pub extra_args: Vec<String>,
    /// Byte capacity of bulk reads, write chunks and the line cursor.
    pub buffer_size: usize,
    /// Deadline for the child to exit on close. `None` waits forever.
    pub wait_timeout: Option<Duration>,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            extra_args: Vec::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            wait_timeout: None,
        }
    }
}

impl PipeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `OXIGZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; malformed values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(program) = lookup(ENV_PROGRAM).filter(|p| !p.is_empty()) {
            config.program = PathBuf::from(program);
        }

        if let Some(value) = lookup(ENV_BUFFER_SIZE) {
            config.buffer_size = value.trim().parse().map_err(|_| {
                OxiGzError::invalid_config(format!("{ENV_BUFFER_SIZE}={value:?} is not a number"))
            })?;
        }

        if let Some(value) = lookup(ENV_WAIT_TIMEOUT_MS) {
            let millis: u64 = value.trim().parse().map_err(|_| {
                OxiGzError::invalid_config(format!(
                    "{ENV_WAIT_TIMEOUT_MS}={value:?} is not a number"
                ))
            })?;
            config.wait_timeout = Some(Duration::from_millis(millis));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the compression program.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Append an extra argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Set the buffer size.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the close deadline.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(OxiGzError::invalid_config("buffer size must be positive"));
        }
        if self.program.as_os_str().is_empty() {
            return Err(OxiGzError::invalid_config("program must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipeConfig::default();
        assert_eq!(config.program, PathBuf::from("oxigz"));
        assert_eq!(config.buffer_size, 32768);
        assert!(config.extra_args.is_empty());
        assert!(config.wait_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipeConfig::new()
            .with_program("/usr/bin/pigz")
            .with_arg("-p")
            .with_arg("2")
            .with_buffer_size(64)
            .with_wait_timeout(Duration::from_secs(3));
        assert_eq!(config.program, PathBuf::from("/usr/bin/pigz"));
        assert_eq!(config.extra_args, vec!["-p", "2"]);
        assert_eq!(config.buffer_size, 64);
        assert_eq!(config.wait_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = PipeConfig::new().with_buffer_size(0).validate().unwrap_err();
        assert!(matches!(err, OxiGzError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_lookup() {
        let config = PipeConfig::from_lookup(lookup_from(&[
            (ENV_PROGRAM, "gzip"),
            (ENV_BUFFER_SIZE, " 4096 "),
            (ENV_WAIT_TIMEOUT_MS, "1500"),
        ]))
        .unwrap();
        assert_eq!(config.program, PathBuf::from("gzip"));
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.wait_timeout, Some(Duration::from_millis(1500)));

        let config = PipeConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PipeConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = PipeConfig::from_lookup(lookup_from(&[(ENV_BUFFER_SIZE, "lots")])).unwrap_err();
        assert!(err.to_string().contains(ENV_BUFFER_SIZE));

        let err = PipeConfig::from_lookup(lookup_from(&[(ENV_BUFFER_SIZE, "0")])).unwrap_err();
        assert!(matches!(err, OxiGzError::InvalidConfig { .. }));
    }
}
