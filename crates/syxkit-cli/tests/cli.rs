use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("syxkit"))
}

fn access_virus_message(cutoff: u8) -> Vec<u8> {
    let mut message = vec![0u8; 256];
    message[0] = 0xF0;
    message[1..4].copy_from_slice(&[0x00, 0x20, 0x33]);
    message[40] = cutoff;
    message[200..205].copy_from_slice(b"Bass1");
    message[255] = 0xF7;
    message
}

#[test]
fn help_supports_analyze_and_analyse() {
    cmd().arg("analyze").arg("--help").assert().success();
    cmd().arg("analyse").arg("--help").assert().success();
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.syx");

    cmd()
        .arg("decode")
        .arg(missing)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("notes.txt");
    fs::write(&input, "not sysex").expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("unsupported input format"));
}

#[test]
fn decode_stdout_outputs_presets_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bank.syx");
    fs::write(&input, access_virus_message(100)).expect("write input");

    let assert = cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let presets: Value = serde_json::from_str(&stdout).expect("valid json");
    let presets = presets.as_array().expect("array of presets");
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0]["parameters"]["filter_cutoff"]["raw_value"], 100);
    assert_eq!(presets[0]["metadata"]["preset_name"], "Bass1");
}

#[test]
fn decode_writes_report_file() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bank.syx");
    let output = temp.path().join("out").join("presets.json");
    fs::write(&input, access_virus_message(64)).expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("OK:"));

    let json = fs::read_to_string(&output).expect("read output");
    let _: Value = serde_json::from_str(&json).expect("valid json");
}

#[test]
fn stdout_and_output_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bank.syx");
    fs::write(&input, access_virus_message(64)).expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(temp.path().join("presets.json"))
        .assert()
        .failure();
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bank.syx");
    fs::write(&input, access_virus_message(64)).expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure();
}

#[test]
fn formats_lists_builtin_definitions() {
    cmd()
        .arg("formats")
        .assert()
        .success()
        .stdout(contains("access_virus"));
}

#[test]
fn template_config_decodes_matching_dump() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("custom.json");

    cmd()
        .arg("template")
        .arg("Custom Synthesizer")
        .arg("-o")
        .arg(&config)
        .assert()
        .success()
        .stderr(contains("OK:"));

    // The template's manufacturer id is 00 00 00; craft a matching dump.
    let mut message = vec![0u8; 256];
    message[0] = 0xF0;
    message[10] = 42;
    message[255] = 0xF7;
    let input = temp.path().join("dump.syx");
    fs::write(&input, message).expect("write input");

    let assert = cmd()
        .arg("decode")
        .arg(input)
        .arg("--format")
        .arg("custom_synth")
        .arg("--config")
        .arg(&config)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let presets: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(
        presets[0]["parameters"]["example_parameter"]["raw_value"],
        42
    );
}

#[test]
fn invalid_config_fails_with_hint() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("broken.json");
    fs::write(&config, r#"{ "name": "No Header" }"#).expect("write config");
    let input = temp.path().join("bank.syx");
    fs::write(&input, access_virus_message(64)).expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--config")
        .arg(&config)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("definition config").and(contains("hint:")));
}

#[test]
fn analyze_inventories_messages() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("unknown.syx");
    let mut stream = vec![0xF0, 0x43, 0x00, 0x01, 0xF7];
    stream.extend_from_slice(&access_virus_message(10));
    fs::write(&input, stream).expect("write input");

    let assert = cmd()
        .arg("analyse")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let analysis: Value = serde_json::from_str(&stdout).expect("valid json");
    let messages = analysis["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["manufacturer_id"][0], 0x43);
}

#[test]
fn batch_reports_failures_without_aborting() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("a.syx"), access_virus_message(1)).expect("write a");
    fs::write(temp.path().join("b.syx"), access_virus_message(2)).expect("write b");
    fs::write(temp.path().join("broken.json"), "not json").expect("write broken");

    let assert = cmd()
        .arg("batch")
        .arg(temp.path())
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let report: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(report["total_presets"], 2);
    assert_eq!(report["processed"].as_array().unwrap().len(), 2);
    assert_eq!(report["failed"].as_array().unwrap().len(), 1);
}

#[test]
fn batch_strict_fails_on_decode_errors() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("broken.json"), "not json").expect("write broken");

    cmd()
        .arg("batch")
        .arg(temp.path())
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("failed to decode"));
}

#[test]
fn batch_write_decoded_emits_json_beside_inputs() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("bank.syx"), access_virus_message(3)).expect("write input");

    cmd()
        .arg("batch")
        .arg(temp.path())
        .arg("--write-decoded")
        .arg("-o")
        .arg(temp.path().join("report.json"))
        .assert()
        .success();

    let decoded = temp.path().join("bank_decoded.json");
    let json = fs::read_to_string(&decoded).expect("decoded output exists");
    let _: Value = serde_json::from_str(&json).expect("valid json");
}
