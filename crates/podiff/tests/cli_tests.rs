use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const HEADER: &str = "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\n";

fn podiff() -> Command {
    Command::new(env!("CARGO_BIN_EXE_podiff"))
}

fn write_catalog(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("{HEADER}{body}")).unwrap();
    path
}

/// A pair of catalogs whose second entries differ in key
fn dissimilar(dir: &Path) -> (PathBuf, PathBuf) {
    (
        write_catalog(dir, "old.po", "msgid \"a\"\nmsgstr \"A\"\n\nmsgid \"b\"\nmsgstr \"B\"\n"),
        write_catalog(dir, "new.po", "msgid \"a\"\nmsgstr \"A2\"\n\nmsgid \"c\"\nmsgstr \"C\"\n"),
    )
}

fn code(output: &Output) -> Option<i32> {
    output.status.code()
}

#[test]
fn test_identical_catalogs() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "a.po", "msgid \"a\"\nmsgstr \"A\"\n");

    let output = podiff().arg(&path).arg(&path).output().unwrap();

    assert_eq!(code(&output), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(" Number of messages: 0\n"));
}

#[test]
fn test_strict_mismatch_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());

    let output = podiff().arg(&old).arg(&new).output().unwrap();

    assert_eq!(code(&output), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--relax"));
}

#[test]
fn test_relax_and_full() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());

    let relaxed = podiff().arg("-r").arg(&old).arg(&new).output().unwrap();
    assert_eq!(code(&relaxed), Some(0));
    assert!(String::from_utf8(relaxed.stdout).unwrap().contains(" Number of messages: 2\n"));

    let full = podiff().arg("--full").arg(&old).arg(&new).output().unwrap();
    assert_eq!(code(&full), Some(0));
    assert!(String::from_utf8(full.stdout).unwrap().contains(" Number of messages: 3\n"));
}

#[test]
fn test_last_mode_flag_wins() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());

    let output = podiff().args(["-r", "-s"]).arg(&old).arg(&new).output().unwrap();
    assert_eq!(code(&output), Some(2));

    let output = podiff().args(["-s", "-r"]).arg(&old).arg(&new).output().unwrap();
    assert_eq!(code(&output), Some(0));
}

#[test]
fn test_line_number_toggle() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "a.po", "");

    let with = podiff().arg(&path).arg(&path).output().unwrap();
    assert!(String::from_utf8(with.stdout).unwrap().starts_with("--- Line 1 ("));

    let without = podiff().args(["-l", "-m"]).arg(&path).arg(&path).output().unwrap();
    assert!(String::from_utf8(without.stdout).unwrap().starts_with(" msgid \"\"\n"));
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());
    let report = dir.path().join("report.txt");

    let output = podiff().arg("-f").arg("-o").arg(&report).arg(&old).arg(&new).output().unwrap();

    assert_eq!(code(&output), Some(0));
    assert!(output.stdout.is_empty());
    assert!(fs::read_to_string(&report).unwrap().contains(" Number of messages: 3\n"));
}

#[test]
fn test_output_must_not_overwrite_an_input() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());
    let before = fs::read(&new).unwrap();
    let aliased = dir.path().join("sub").join("..").join("new.po");

    let output = podiff().arg("-o").arg(&aliased).arg(&old).arg(&new).output().unwrap();

    assert_eq!(code(&output), Some(2));
    assert_eq!(fs::read(&new).unwrap(), before);
}

#[test]
fn test_failed_load_leaves_output_untouched() {
    let dir = TempDir::new().unwrap();
    let good = write_catalog(dir.path(), "good.po", "");
    let missing = dir.path().join("missing.po");
    let report = dir.path().join("report.txt");
    fs::write(&report, "previous report\n").unwrap();

    let output = podiff().arg("-o").arg(&report).arg(&missing).arg(&good).output().unwrap();

    assert_eq!(code(&output), Some(5));
    assert_eq!(fs::read_to_string(&report).unwrap(), "previous report\n");
}

#[test]
fn test_unopenable_output() {
    let dir = TempDir::new().unwrap();
    let (old, new) = dissimilar(dir.path());
    let report = dir.path().join("missing").join("report.txt");

    let output = podiff().arg("-o").arg(&report).arg(&old).arg(&new).output().unwrap();

    assert_eq!(code(&output), Some(4));
}

#[test]
fn test_missing_and_malformed_inputs() {
    let dir = TempDir::new().unwrap();
    let good = write_catalog(dir.path(), "good.po", "");
    let missing = dir.path().join("missing.po");

    let output = podiff().arg(&missing).arg(&good).output().unwrap();
    assert_eq!(code(&output), Some(5));

    let broken = dir.path().join("broken.po");
    fs::write(&broken, "\"dangling\"\n").unwrap();
    let output = podiff().arg(&good).arg(&broken).output().unwrap();
    assert_eq!(code(&output), Some(5));

    let unknown = dir.path().join("unknown.po");
    fs::write(
        &unknown,
        "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=NO-SUCH-CHARSET\\n\"\n",
    )
    .unwrap();
    let output = podiff().arg(&unknown).arg(&good).output().unwrap();
    assert_eq!(code(&output), Some(5));
}

#[test]
fn test_standard_input() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(dir.path(), "a.po", "msgid \"a\"\nmsgstr \"A\"\n");

    let mut child = podiff()
        .arg("-")
        .arg(&path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(format!("{HEADER}msgid \"a\"\nmsgstr \"old\"\n").as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(code(&output), Some(0));
    assert!(String::from_utf8(output.stdout).unwrap().contains(" Number of messages: 1\n"));
}

#[test]
fn test_both_inputs_from_standard_input() {
    let output = podiff().arg("-").arg("-").stdin(Stdio::null()).output().unwrap();
    assert_eq!(code(&output), Some(2));
}

#[test]
fn test_unknown_flag() {
    let output = podiff().arg("--bogus").arg("a.po").arg("b.po").output().unwrap();
    assert_eq!(code(&output), Some(2));
}
