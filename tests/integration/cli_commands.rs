#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config = dir.path().join("cli.toml");
        Self { dir, config }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write input");
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("jenkinshash");
        cmd.env_remove("JENKINSHASH_LOG")
            .env_remove("JENKINSHASH_CONFIG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf8 stdout")
}

#[test]
fn no_arguments_prints_two_line_usage() {
    let output = cargo_bin_cmd!("jenkinshash")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("jenkinshash"));
}

#[test]
fn rows_hash_each_line_of_a_file() {
    let ws = Workspace::new();
    let input = ws.file("m.csv", "97,98,99\n120,121,122\n");
    let out = stdout_of(ws.cmd().arg("rows").arg(&input));
    assert_eq!(out, "3977453403\n1099665310\n");
}

#[test]
fn rows_read_stdin_when_no_file_given() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["rows", "--type", "u16"]).write_stdin("1, 2\n"));
    assert_eq!(out, "2757400057\n");
}

#[test]
fn rows_emit_json_report() {
    let ws = Workspace::new();
    let input = ws.file("m.tsv", "x\ty\n1\t2\n3\t0\n");
    let out = stdout_of(
        ws.cmd()
            .args(["--format", "json", "rows", "--type", "uint16", "-d", "tab", "--has-headers"])
            .arg(&input),
    );
    let json: Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(json["element_type"], "uint16");
    assert_eq!(json["rows"], 2);
    assert_eq!(json["columns"], 2);
    assert_eq!(json["hashes"][0], 2757400057u64);
    assert_eq!(json["hashes"][1], 899316653u64);
}

#[test]
fn unsupported_type_fails_without_output() {
    let ws = Workspace::new();
    let input = ws.file("m.csv", "1,0\n");
    let assert = ws
        .cmd()
        .args(["rows", "--type", "logical"])
        .arg(&input)
        .assert()
        .failure()
        .code(1);
    let output = assert.get_output();
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("element type logical is not supported"),
        "stderr: {stderr}"
    );
}

#[test]
fn ragged_input_fails_without_output() {
    let ws = Workspace::new();
    let input = ws.file("m.csv", "1,2\n3\n");
    let assert = ws.cmd().arg("rows").arg(&input).assert().failure();
    let output = assert.get_output();
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected 2 columns"));
}

#[test]
fn text_hashes_each_argument() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["text", "abc", "a"]));
    assert_eq!(out, "3977453403\n3392050242\n");
    let out = stdout_of(ws.cmd().args(["text", "--radix", "hex", "abc"]));
    assert_eq!(out, "ed131f5b\n");
}

#[test]
fn bytes_hash_whole_file() {
    let ws = Workspace::new();
    let input = ws.file("blob.bin", "hello");
    let out = stdout_of(ws.cmd().arg("bytes").arg(&input));
    assert_eq!(out, "3372029979\n");
}

#[test]
fn default_profile_supplies_settings() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set-profile", "wide", "--type", "uint16", "--radix", "hex", "--default"])
        .assert()
        .success();
    assert!(ws.config.exists());
    let saved = fs::read_to_string(&ws.config).unwrap();
    assert!(saved.contains("default_profile = \"wide\""), "{saved}");

    let input = ws.file("m.csv", "1,2\n");
    let out = stdout_of(ws.cmd().arg("rows").arg(&input));
    assert_eq!(out, "a45a95f9\n");

    // Explicit flags beat the profile.
    let out = stdout_of(ws.cmd().args(["rows", "--radix", "dec"]).arg(&input));
    assert_eq!(out, "2757400057\n");
}

#[test]
fn profile_lifecycle() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set-profile", "bytes", "--type", "uint8"])
        .assert()
        .success();
    let out = stdout_of(ws.cmd().args(["config", "show"]));
    assert!(out.contains("[profiles.bytes]"), "{out}");
    assert!(out.contains("element_type = uint8"), "{out}");

    let out = stdout_of(ws.cmd().args(["config", "path"]));
    assert_eq!(Path::new(out.trim()), ws.config.as_path());

    ws.cmd().args(["config", "use", "bytes"]).assert().success();
    ws.cmd().args(["config", "use", "--clear"]).assert().success();
    ws.cmd().args(["config", "delete", "bytes"]).assert().success();
    ws.cmd()
        .args(["config", "delete", "bytes"])
        .assert()
        .failure();
}

#[test]
fn unknown_profile_is_an_error() {
    let ws = Workspace::new();
    let assert = ws
        .cmd()
        .args(["--profile", "nope", "text", "abc"])
        .assert()
        .failure();
    assert!(String::from_utf8_lossy(&assert.get_output().stderr).contains("profile 'nope' not found"));
}

#[test]
fn invalid_config_file_is_reported() {
    let ws = Workspace::new();
    fs::write(&ws.config, "[profiles.bad]\nelement_type = \"quaternion\"\n").unwrap();
    let assert = ws.cmd().args(["text", "abc"]).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("element_type value 'quaternion' is invalid"), "{stderr}");
}

#[test]
fn no_headers_flag_overrides_profile() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set-profile", "hdr", "--has-headers", "true", "--default"])
        .assert()
        .success();
    let input = ws.file("m.csv", "1,2\n3,0\n");

    let out = stdout_of(ws.cmd().arg("rows").arg(&input));
    assert_eq!(out, "1672168437\n");

    let out = stdout_of(ws.cmd().args(["rows", "--no-headers"]).arg(&input));
    assert_eq!(out, "1166838264\n1672168437\n");

    ws.cmd()
        .args(["rows", "--has-headers", "--no-headers"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn huge_double_hashes_as_zero_byte() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["rows", "--type", "double"]).write_stdin("1e30\n"));
    assert_eq!(out, "0\n");
}
