//! Integration tests for the generate, compute, verify, show, and config commands.
//!
//! The first half exercises the library functions that back each command;
//! the second half runs the compiled binary in a scratch directory to check
//! output and exit codes.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

use devkey::derive;
use devkey::provision::{ProvisionError, Provisioner};
use devkey::store::{FileSink, FileSource, KeySink, StoreError};

const GOLDEN_ID: &str = "ABC123";
const GOLDEN_KEY: &str = "22af9bb3596029e03316ff0915c9317bc656ef7351";

fn file_provisioner(dir: &Path) -> Provisioner<FileSource, FileSink> {
    Provisioner::new(
        FileSource::new(dir.join("DEVICE_ID")),
        FileSink::new(dir.join("DEVICE_KEY")),
    )
}

// ---------------------------------------------------------------------------
// library: generate / verify
// ---------------------------------------------------------------------------

#[test]
fn generate_writes_golden_key_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123\n").unwrap();

    let out = file_provisioner(dir.path()).provision().unwrap();
    assert_eq!(out.device_id, GOLDEN_ID);
    assert_eq!(out.device_key.as_str(), GOLDEN_KEY);

    let persisted = std::fs::read_to_string(dir.path().join("DEVICE_KEY")).unwrap();
    assert_eq!(persisted, GOLDEN_KEY);
}

#[test]
fn persisted_key_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "unit-7").unwrap();

    let p = file_provisioner(dir.path());
    let out = p.provision().unwrap();
    let read_back = FileSink::new(dir.path().join("DEVICE_KEY")).read_key().unwrap();
    assert_eq!(read_back, out.device_key);
    assert_eq!(read_back.as_str().len(), derive::KEY_LEN);
}

#[test]
fn generate_missing_identifier_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = file_provisioner(dir.path()).provision().unwrap_err();
    assert!(
        matches!(err, ProvisionError::Store(StoreError::SourceMissing { .. })),
        "got: {err:?}"
    );
    assert!(!dir.path().join("DEVICE_KEY").exists());
}

#[test]
fn generate_empty_identifier_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "\n").unwrap();
    let err = file_provisioner(dir.path()).provision().unwrap_err();
    assert!(
        matches!(err, ProvisionError::Store(StoreError::EmptyIdentifier { .. })),
        "got: {err:?}"
    );
    assert!(!dir.path().join("DEVICE_KEY").exists());
}

#[test]
fn verify_detects_identifier_change() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123").unwrap();
    file_provisioner(dir.path()).provision().unwrap();

    std::fs::write(dir.path().join("DEVICE_ID"), "ABC124").unwrap();
    let v = file_provisioner(dir.path()).verify().unwrap();
    assert!(!v.matches);
    assert_eq!(v.stored.as_str(), GOLDEN_KEY);
}

#[test]
fn switching_identifier_back_restores_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let id_path = dir.path().join("DEVICE_ID");
    let key_path = dir.path().join("DEVICE_KEY");
    let p = file_provisioner(dir.path());

    std::fs::write(&id_path, "ABC123").unwrap();
    p.provision().unwrap();
    std::fs::write(&id_path, "ABC124").unwrap();
    p.provision().unwrap();
    assert_eq!(
        std::fs::read_to_string(&key_path).unwrap(),
        derive::derive("ABC124").unwrap().as_str()
    );

    std::fs::write(&id_path, "ABC123").unwrap();
    let out = p.provision().unwrap();
    assert!(out.fresh);
    assert_eq!(std::fs::read_to_string(&key_path).unwrap(), GOLDEN_KEY);
    assert!(p.verify().unwrap().matches);
}

// ---------------------------------------------------------------------------
// binary
// ---------------------------------------------------------------------------

fn devkey(dir: &Path, args: &[&str]) -> Output {
    devkey_with_env(dir, args, &[])
}

fn devkey_with_env(dir: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_devkey"));
    cmd.args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("DEVKEY_ID_FILE")
        .env_remove("DEVKEY_KEY_FILE")
        .env_remove("DEVKEY_LOG")
        .env_remove("RUST_LOG");
    for (name, value) in vars {
        cmd.env(name, value);
    }
    cmd.output().unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn bin_default_command_generates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123\n").unwrap();

    let out = devkey(dir.path(), &[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Device ID:"), "stdout: {stdout}");
    assert!(stdout.contains(GOLDEN_ID));
    assert!(stdout.contains(GOLDEN_KEY));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("DEVICE_KEY")).unwrap(),
        GOLDEN_KEY
    );
}

#[test]
fn bin_generate_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123").unwrap();

    let out = devkey(dir.path(), &["generate", "--format", "json"]);
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert_eq!(json["device_id"], GOLDEN_ID);
    assert_eq!(json["device_key"], GOLDEN_KEY);
    assert_eq!(json["fresh"], true);
}

#[test]
fn bin_missing_identifier_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey(dir.path(), &["generate"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error:"), "stderr: {stderr}");
    assert!(stderr.contains("DEVICE_ID"), "stderr: {stderr}");
}

#[test]
fn bin_empty_identifier_tells_operator() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "   \n").unwrap();
    let out = devkey(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("empty"), "stderr: {stderr}");
    assert!(stderr.contains("Populate"), "stderr: {stderr}");
    assert!(!dir.path().join("DEVICE_KEY").exists());
}

#[test]
fn bin_custom_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("id.txt"), "ABC123").unwrap();

    let out = devkey(
        dir.path(),
        &["--id-file", "id.txt", "--key-file", "keys/device.key", "generate"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("keys/device.key")).unwrap(),
        GOLDEN_KEY
    );
}

#[test]
fn bin_local_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".devkey.toml"),
        "[paths]\ndevice_id = \"serial\"\ndevice_key = \"serial.key\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("serial"), "ABC123").unwrap();

    let out = devkey(dir.path(), &["generate"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("serial.key")).unwrap(),
        GOLDEN_KEY
    );
}

#[test]
fn bin_compute_is_pure() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey(dir.path(), &["compute", "ABC123", "--trace", "--format", "json"]);
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert_eq!(json["device_key"], GOLDEN_KEY);
    assert_eq!(json["trace"]["h2"], "22af9bb3596029e03316ff0915c9317bc656ef73");
    assert!(!dir.path().join("DEVICE_KEY").exists());
}

#[test]
fn bin_compute_empty_identifier_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey(dir.path(), &["compute", ""]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("empty"));
}

#[test]
fn bin_verify_and_show() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123").unwrap();
    assert!(devkey(dir.path(), &["generate"]).status.success());

    let verify = devkey(dir.path(), &["verify", "--format", "json"]);
    assert!(verify.status.success());
    assert_eq!(stdout_json(&verify)["matches"], true);

    let show = devkey(dir.path(), &["show", "--format", "json"]);
    assert!(show.status.success());
    assert_eq!(stdout_json(&show)["device_key"], GOLDEN_KEY);
}

#[test]
fn bin_verify_mismatch_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123").unwrap();
    assert!(devkey(dir.path(), &["generate"]).status.success());
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC124").unwrap();

    let out = devkey(dir.path(), &["verify"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not match"));
}

#[test]
fn bin_config_reports_resolved_paths() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey(dir.path(), &["config", "--format", "json"]);
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert!(json["id_file"].as_str().unwrap().ends_with("DEVICE_ID"));
    assert!(json["key_file"].as_str().unwrap().ends_with("DEVICE_KEY"));
    assert_eq!(json["log_level"], "warn");
}

#[test]
fn bin_version_reports_name_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey(dir.path(), &["version"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("devkey"), "stdout: {stdout}");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout: {stdout}");
    assert!(stdout.contains("target:"), "stdout: {stdout}");
}

#[test]
fn bin_empty_env_value_is_reported_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DEVICE_ID"), "ABC123").unwrap();

    let out = devkey_with_env(dir.path(), &["generate"], &[("DEVKEY_KEY_FILE", "  ")]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ignoring empty DEVKEY_KEY_FILE value"), "stderr: {stderr}");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("DEVICE_KEY")).unwrap(),
        GOLDEN_KEY
    );
}

#[test]
fn bin_invalid_log_level_falls_back_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let out = devkey_with_env(dir.path(), &["compute", "ABC123"], &[("DEVKEY_LOG", "devkey=notalevel")]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ignoring invalid log level"), "stderr: {stderr}");
    assert!(String::from_utf8_lossy(&out.stdout).contains(GOLDEN_KEY));
}
