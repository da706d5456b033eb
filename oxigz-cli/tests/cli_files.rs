//! End-to-end tests of the `oxigz` command.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn oxigz() -> Command {
    Command::new(env!("CARGO_BIN_EXE_oxigz"))
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("oxigz_cli_{}_{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = oxigz()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let input = input.to_vec();
    let feeder = std::thread::spawn(move || {
        stdin.write_all(&input).unwrap();
    });
    let output = child.wait_with_output().unwrap();
    feeder.join().unwrap();
    output
}

#[test]
fn test_compress_and_decompress_file() {
    let dir = temp_dir("file_mode");
    let plain = dir.join("notes.txt");
    let packed = dir.join("notes.txt.gz");
    let text = "Hello, World!\nThis is a test\n".repeat(100);
    fs::write(&plain, &text).unwrap();

    let status = oxigz().arg(&plain).status().unwrap();
    assert!(status.success());
    assert!(!plain.exists(), "input should be removed");
    assert!(packed.exists());

    let status = oxigz().arg("-d").arg(&packed).status().unwrap();
    assert!(status.success());
    assert!(!packed.exists());
    assert_eq!(fs::read_to_string(&plain).unwrap(), text);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_keep_and_refuse_overwrite() {
    let dir = temp_dir("keep");
    let plain = dir.join("data.txt");
    let packed = dir.join("data.txt.gz");
    fs::write(&plain, "keep me\n").unwrap();

    assert!(oxigz().arg("-k").arg(&plain).status().unwrap().success());
    assert!(plain.exists());
    assert!(packed.exists());

    // Existing output without -f is an error.
    let output = oxigz().arg("-k").arg(&plain).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    assert!(
        oxigz()
            .args(["-k", "-f"])
            .arg(&plain)
            .status()
            .unwrap()
            .success()
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_preserves_modification_time() {
    let dir = temp_dir("mtime");
    let plain = dir.join("old.txt");
    fs::write(&plain, "from the past\n").unwrap();
    let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&plain, past).unwrap();

    assert!(oxigz().arg(&plain).status().unwrap().success());
    let metadata = fs::metadata(dir.join("old.txt.gz")).unwrap();
    assert_eq!(
        filetime::FileTime::from_last_modification_time(&metadata),
        past
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_unknown_suffix_on_decompress() {
    let dir = temp_dir("suffix");
    let plain = dir.join("plain.txt");
    fs::write(&plain, "x").unwrap();

    let output = oxigz().arg("-d").arg(&plain).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown suffix"));
    // One line per failed file, no trailing summary.
    assert_eq!(stderr.lines().count(), 1, "stderr: {stderr}");
    assert!(plain.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_stdin_to_stdout_roundtrip() {
    let text = "line one\nline two\n".repeat(10_000);

    let compressed = run_with_stdin(&["-c", "-f", "-q", "-p", "3", "-b", "8"], text.as_bytes());
    assert!(compressed.status.success());
    assert_eq!(&compressed.stdout[..2], &[0x1f, 0x8b]);

    let decompressed = run_with_stdin(&["-d", "-c"], &compressed.stdout);
    assert!(decompressed.status.success());
    assert_eq!(decompressed.stdout, text.as_bytes());
}

#[test]
fn test_decompress_to_stdout_keeps_input() {
    let dir = temp_dir("to_stdout");
    let packed = dir.join("kept.gz");
    let compressed = run_with_stdin(&["-f"], b"kept text\n");
    fs::write(&packed, &compressed.stdout).unwrap();

    let output = oxigz().args(["-d", "-c", "-f", "-q"]).arg(&packed).output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"kept text\n");
    assert!(packed.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_in_process_call() {
    let dir = temp_dir("call");
    let plain = dir.join("inproc.txt");
    fs::write(&plain, "called in process\n").unwrap();
    let arg = plain.to_string_lossy().into_owned();

    assert_eq!(oxigz_cli::call(["oxigz", "-q", arg.as_str()]), 0);
    assert!(dir.join("inproc.txt.gz").exists());
    assert!(!plain.exists());

    let packed = dir.join("inproc.txt.gz").to_string_lossy().into_owned();
    assert_eq!(oxigz_cli::call(["oxigz", "-d", "-q", packed.as_str()]), 0);
    assert_eq!(fs::read_to_string(&plain).unwrap(), "called in process\n");

    let _ = fs::remove_dir_all(&dir);
}
