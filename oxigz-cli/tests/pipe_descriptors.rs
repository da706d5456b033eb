//! Descriptor and process hygiene of pipe handles.
//!
//! Kept in its own test binary with a single test so no concurrently running
//! test opens descriptors while they are being counted.

#![cfg(target_os = "linux")]

use oxigz_core::{OxiGzError, PipeConfig};
use oxigz_pipe::{GzPipe, open_with};
use std::path::Path;

fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

fn config() -> PipeConfig {
    PipeConfig::new()
        .with_program(env!("CARGO_BIN_EXE_oxigz"))
        .with_buffer_size(256)
}

#[test]
fn test_no_leaked_descriptors_or_zombies() {
    let path = std::env::temp_dir().join(format!("oxigz_fds_{}.gz", std::process::id()));
    let text = "alpha\nbeta\ngamma\n".repeat(50);
    let before = open_fds();

    for _ in 0..20 {
        let mut writer = open_with(&path, "wt", config()).unwrap();
        writer.write_str(&text).unwrap();
        let pid = writer.id().unwrap();
        writer.close().unwrap();
        assert!(!Path::new(&format!("/proc/{pid}")).exists(), "pid {pid} not reaped");

        let mut reader = open_with(&path, "rt", config()).unwrap();
        assert_eq!(reader.read_text().unwrap(), text);
        reader.close().unwrap();

        let mut lines = open_with(&path, "rt", config()).unwrap();
        let first = lines.lines().unwrap().next().unwrap().unwrap();
        assert_eq!(first, "alpha\n");
        let pid = lines.id().unwrap();
        lines.close().unwrap();
        assert!(!Path::new(&format!("/proc/{pid}")).exists(), "pid {pid} not reaped");
    }
    assert_eq!(open_fds(), before, "open/close cycles leaked descriptors");

    for mode in ["rt", "wt"] {
        let missing = PipeConfig::new().with_program("/nonexistent/oxigz-missing");
        let mut pipe = GzPipe::with_config(&path, mode, missing).unwrap();
        assert!(matches!(pipe.open(), Err(OxiGzError::Spawn { .. })));
    }
    assert_eq!(open_fds(), before, "failed opens leaked descriptors");

    let _ = std::fs::remove_file(&path);
}
