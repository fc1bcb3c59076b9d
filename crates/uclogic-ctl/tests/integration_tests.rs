//! Integration tests for the uclogic-ctl CLI
//!
//! Every command is run against device-info files in a temporary directory,
//! checking both output and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const GAOMON_M7: &str = "\
HUION_FIRMWARE_ID=\"GM001_T207_210524\"
HUION_MAGIC_BYTES=\"120070c600067c00ff1fc8000d0d00000000\"
";

fn uclogic_ctl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("uclogic-ctl")?;
    cmd.env_remove("UCLOGIC_CONFIG").env_remove("RUST_LOG");
    Ok(cmd)
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| serde_json::from_slice::<Value>(s).is_ok())
}

#[test]
fn test_cli_help() -> TestResult {
    uclogic_ctl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("device-info files"));
    Ok(())
}

#[test]
fn test_cli_version() -> TestResult {
    uclogic_ctl()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("uclogic-ctl"));
    Ok(())
}

#[test]
fn test_completion_generation() -> TestResult {
    uclogic_ctl()?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_uclogic__ctl"));
    Ok(())
}

// Info

#[test]
fn test_info_human_output() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .success()
        .stdout(predicate::str::contains("Gaomon M7"))
        .stdout(predicate::str::contains(
            "Device with 13 buttons, max pen pressure 8191, logical size (50800, 31750)",
        ))
        .stdout(predicate::str::contains("Extended"));
    Ok(())
}

#[test]
fn test_info_json_output() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    let output = uclogic_ctl()?
        .args(["--json", "info", "--device-info"])
        .arg(&info)
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["success"], true);
    assert_eq!(json["device"]["firmware_id"], "GM001_T207_210524");
    assert_eq!(json["device"]["family"], "primary");
    assert_eq!(json["device"]["layout"], "extended");
    assert_eq!(json["device"]["capabilities"]["logical_max_x"], 50800);
    assert_eq!(json["device"]["capabilities"]["button_count"], 13);
    assert_eq!(json["device"]["physical_max_x_um"], 254_000);
    assert_eq!(json["device"]["descriptor_len"], 278);
    Ok(())
}

#[test]
fn test_info_missing_firmware_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(
        &dir,
        "nofw.txt",
        "HUION_MAGIC_BYTES=\"120070c600067c00ff1fc8000d0d00000000\"\n",
    )?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No firmware id found"));
    Ok(())
}

#[test]
fn test_info_legacy_device_unsupported() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "v1.txt", &format!("{GAOMON_M7}HUION_PAD_MODE=\"1\"\n"))?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn test_info_unknown_firmware_needs_force() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(
        &dir,
        "q630.txt",
        "HUION_FIRMWARE_ID=\"HUION_T21j_221221\"\nHUION_MAGIC_BYTES=\"120070c600067c00ff1fc800080800000000\"\n",
    )?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    uclogic_ctl()?
        .args(["info", "--force", "--device-info"])
        .arg(&info)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compact"));
    Ok(())
}

#[test]
fn test_info_malformed_capabilities() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(
        &dir,
        "bad.txt",
        "HUION_FIRMWARE_ID=\"GM001_T207_210524\"\nHUION_MAGIC_BYTES=\"12zz\"\n",
    )?;

    let output = uclogic_ctl()?
        .args(["--json", "info", "--device-info"])
        .arg(&info)
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["type"], "classification");
    Ok(())
}

#[test]
fn test_missing_device_info_file() -> TestResult {
    uclogic_ctl()?
        .args(["info", "--device-info", "/nonexistent/uclogic/device-info"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("IO error"));
    Ok(())
}

#[test]
fn test_badly_quoted_device_info() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "quote.txt", "HUION_FIRMWARE_ID=GM001_T207_210524\n")?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .code(4);
    Ok(())
}

// Descriptor

#[test]
fn test_descriptor_vendor_interface() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    uclogic_ctl()?
        .arg("descriptor")
        .arg("--device-info")
        .arg(&info)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("R: 278 05 0d 09 01 a1 01 85 08"));
    Ok(())
}

#[test]
fn test_descriptor_other_interface_disabled() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;
    let rdesc = dir.path().join("rdesc.bin");
    fs::write(&rdesc, [0x05u8, 0x01, 0x09, 0x02, 0xa1, 0x01, 0xc0])?;

    uclogic_ctl()?
        .arg("descriptor")
        .arg("--device-info")
        .arg(&info)
        .arg("--rdesc")
        .arg(&rdesc)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "R: 14 06 ff ff 09 01 a1 01 95 40 75 08 81 01 c0\n",
        ));
    Ok(())
}

#[test]
fn test_descriptor_from_hid_decode_line() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;
    let rdesc = write_file(&dir, "rdesc.txt", "R: 5 06 00 ff 09 01\n")?;

    let output = uclogic_ctl()?
        .args(["--json", "descriptor", "--device-info"])
        .arg(&info)
        .arg("--rdesc")
        .arg(&rdesc)
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["descriptor"]["mode"], "normalize");
    Ok(())
}

#[test]
fn test_descriptor_short_rdesc() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;
    let rdesc = dir.path().join("short.bin");
    fs::write(&rdesc, [0x06u8, 0x00])?;

    uclogic_ctl()?
        .arg("descriptor")
        .arg("--device-info")
        .arg(&info)
        .arg("--rdesc")
        .arg(&rdesc)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("too short"));
    Ok(())
}

// Replay

const RECORDING: &str = "\
# Gaomon M7
R: 3 06 00 ff
E: 000000.000000 12 08 80 e0 03 8b 0d 00 00 00 00 00 00
E: 000000.008000 12 08 e0 01 01 02 00 00 00 00 00 00 00
E: 000000.016000 12 08 f0 01 01 00 05 00 00 00 00 00 00
E: 000000.024000 12 08 f0 01 01 00 06 00 00 00 00 00 00
E: 000000.032000 12 08 f1 01 01 00 01 00 00 00 00 00 00
";

#[test]
fn test_replay_from_file() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;
    let input = write_file(&dir, "rec.txt", RECORDING)?;

    uclogic_ctl()?
        .arg("replay")
        .arg("--device-info")
        .arg(&info)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "\
E: 000000.000000 12 08 80 e0 03 00 8b 0d 00 00 00 00 00
E: 000000.008000 12 03 00 00 00 02 00 00 00 00 00 00 00
# No event
E: 000000.024000 12 f0 00 00 00 00 01 00 00 00 00 00 00
E: 000000.032000 12 f0 00 00 00 00 01 00 00 00 00 00 00
",
        ));
    Ok(())
}

#[test]
fn test_replay_from_stdin_json() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    let output = uclogic_ctl()?
        .args(["--json", "replay", "--device-info"])
        .arg(&info)
        .write_stdin(RECORDING)
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["summary"]["rewritten"], 4);
    assert_eq!(json["summary"]["dropped"], 1);
    assert_eq!(json["events"][2]["action"], "dropped");
    assert_eq!(json["events"][1]["action"], "rewritten");
    Ok(())
}

#[test]
fn test_replay_invalid_recording() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    uclogic_ctl()?
        .args(["replay", "--device-info"])
        .arg(&info)
        .write_stdin("E: 000000.000000 12 08 e0\n")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("line 1"));
    Ok(())
}

// Check

#[test]
fn test_check_supported_device() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    uclogic_ctl()?
        .args(["check", "--vid", "256c", "--pid", "0064", "--device-info"])
        .arg(&info)
        .assert()
        .success()
        .stdout(predicate::str::contains("Device supported"));
    Ok(())
}

#[test]
fn test_check_unsupported_pid() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;

    uclogic_ctl()?
        .args(["check", "--vid", "256c", "--pid", "006d", "--device-info"])
        .arg(&info)
        .assert()
        .code(2);

    uclogic_ctl()?
        .args(["--json", "check", "--force", "--vid", "256c", "--pid", "006d", "--device-info"])
        .arg(&info)
        .assert()
        .success()
        .stdout(is_json())
        .stdout(predicate::str::contains("\"forced\": true"));
    Ok(())
}

#[test]
fn test_config_extends_firmware_list() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(
        &dir,
        "q630.txt",
        "HUION_FIRMWARE_ID=\"HUION_T21j_221221\"\nHUION_MAGIC_BYTES=\"120070c600067c00ff1fc800080800000000\"\n",
    )?;
    let config = write_file(
        &dir,
        "uclogic.yaml",
        "firmware:\n  - id: HUION_T21j_221221\n    name: Huion Q630M\n    family: secondary\n",
    )?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .env("UCLOGIC_CONFIG", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Huion Q630M"))
        .stdout(predicate::str::contains("Secondary"));
    Ok(())
}

#[test]
fn test_invalid_config_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    let info = write_file(&dir, "m7.txt", GAOMON_M7)?;
    let config = write_file(&dir, "bad.yaml", "firmware: 12\n")?;

    uclogic_ctl()?
        .arg("info")
        .arg("--device-info")
        .arg(&info)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("YAML error"));
    Ok(())
}
