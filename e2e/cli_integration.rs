// e2e/cli_integration.rs: black-box tests of the `lzo` binary.
//
// Runs the built executable with std::process::Command and checks exit
// codes, produced files and stdout payloads.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `lzo` binary produced by Cargo.
fn lzo_bin() -> PathBuf {
    if let Some(p) = option_env!("CARGO_BIN_EXE_lzo") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lzo");
    p
}

fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "Hello, LZO!\n".repeat(400)).unwrap();
    (dir, input)
}

fn run(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(lzo_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run lzo")
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ── Round trips ──────────────────────────────────────────────────────────────

#[test]
fn compress_decompress_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("out.lzo");
    let back = dir.path().join("back.txt");

    assert!(run(dir.path(), &["-f", s(&input), s(&packed)]).status.success());
    assert!(run(dir.path(), &["-d", "-f", s(&packed), s(&back)]).status.success());
    assert_eq!(fs::read(&input).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn automatic_names_from_extension() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    assert!(run(dir.path(), &["input.txt"]).status.success());
    let packed = dir.path().join("input.txt.lzo");
    assert!(packed.exists());
    assert!(input.exists(), "source is kept by default");

    fs::remove_file(&input).unwrap();
    assert!(run(dir.path(), &["input.txt.lzo"]).status.success());
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn existing_output_needs_force() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("input.txt.lzo");
    fs::write(&packed, b"occupied").unwrap();

    assert!(!run(dir.path(), &[s(&input)]).status.success());
    assert_eq!(fs::read(&packed).unwrap(), b"occupied");
    assert!(run(dir.path(), &["-f", s(&input)]).status.success());
    assert_ne!(fs::read(&packed).unwrap(), b"occupied");
}

#[test]
fn rm_removes_source() {
    let (dir, input) = make_temp_input();
    assert!(run(dir.path(), &["--rm", s(&input)]).status.success());
    assert!(!input.exists());
    assert!(dir.path().join("input.txt.lzo").exists());
}

#[test]
fn stdin_to_stdout_pipeline() {
    let data = "piped through lzo ".repeat(1000);

    let mut child = Command::new(lzo_bin())
        .arg("-c")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(data.as_bytes()).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert!(packed.stdout.starts_with(&[0x89, b'L', b'Z', b'O']));

    let mut child = Command::new(lzo_bin())
        .args(["-d", "-c"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let plain = child.wait_with_output().unwrap();
    assert!(plain.status.success());
    assert_eq!(plain.stdout, data.as_bytes());
}

#[test]
fn multiple_inputs_to_stdout() {
    let (dir, input) = make_temp_input();
    let other = dir.path().join("other.txt");
    fs::write(&other, b"second file\n").unwrap();
    assert!(run(dir.path(), &["-m", s(&input), s(&other)]).status.success());

    let out = run(dir.path(), &["-dc", "-m", "input.txt.lzo", "other.txt.lzo"]);
    assert!(out.status.success());
    let mut expected = fs::read(&input).unwrap();
    expected.extend_from_slice(b"second file\n");
    assert_eq!(out.stdout, expected);
}

#[test]
fn raw_mode_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("raw.lzo");
    let back = dir.path().join("raw.txt");
    assert!(run(dir.path(), &["--raw", s(&input), s(&packed)]).status.success());
    assert!(!fs::read(&packed).unwrap().starts_with(&[0x89]));
    assert!(run(dir.path(), &["-d", "--raw", s(&packed), s(&back)]).status.success());
    assert_eq!(fs::read(&input).unwrap(), fs::read(&back).unwrap());
}

// ── Test and list modes ──────────────────────────────────────────────────────

#[test]
fn test_mode_valid_and_corrupt() {
    let (dir, input) = make_temp_input();
    assert!(run(dir.path(), &[s(&input)]).status.success());
    let packed = dir.path().join("input.txt.lzo");
    assert!(run(dir.path(), &["-t", s(&packed)]).status.success());

    let mut bytes = fs::read(&packed).unwrap();
    let at = bytes.len() - 8;
    bytes[at] ^= 0xff;
    fs::write(&packed, &bytes).unwrap();
    assert!(!run(dir.path(), &["-t", s(&packed)]).status.success());
}

#[test]
fn list_shows_stored_name() {
    let (dir, input) = make_temp_input();
    assert!(run(dir.path(), &[s(&input)]).status.success());
    let out = run(dir.path(), &["-l", "input.txt.lzo"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("LZO1X-1"), "got: {stdout}");
    assert!(stdout.contains("input.txt"), "got: {stdout}");
}

// ── Usage errors ─────────────────────────────────────────────────────────────

#[test]
fn version_and_help() {
    let out = run(Path::new("."), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));

    let out = run(Path::new("."), &["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).to_lowercase().contains("usage"));
}

#[test]
fn unknown_suffix_is_an_error() {
    let (dir, input) = make_temp_input();
    let out = run(dir.path(), &["-d", s(&input)]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown suffix"));
}

#[test]
fn conflicting_modes_rejected() {
    let (dir, input) = make_temp_input();
    let out = run(dir.path(), &["-d", "-z", s(&input)]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad usage"));
}
