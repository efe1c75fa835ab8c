use std::fs;
use std::path::Path;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_event-docs"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

#[test]
fn test_attendance_report() {
    setup();
    let output_file = "test-attendance.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "report",
            "-d", "tests/fixtures/registrations.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let bytes = fs::read(&path).expect("Failed to read PDF");
    assert!(bytes.starts_with(b"%PDF-"), "Output is not a PDF");
    assert!(bytes.len() > 1000, "PDF file is too small, likely empty or corrupt");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Registrations: 2"), "Unexpected summary: {}", stdout);
    assert!(stdout.contains("Pages: 3"), "Unexpected summary: {}", stdout);
}

#[test]
fn test_report_without_paid_registrations() {
    setup();
    let output_file = "should-not-exist-report.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "report",
            "-d", "tests/fixtures/pending_only.json",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed with no data");
    assert_eq!(output.status.code(), Some(2));
    assert!(!output_dir().join(output_file).exists(), "No file should be written");
}

#[test]
fn test_certificate() {
    setup();
    let output_file = "test-certificate.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "certificate",
            "-d", "tests/fixtures/registrations.json",
            "-r", "66a3f1c2e4b0a1b2c3d4e5f6",
            "--team", "0",
            "--member", "0",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small");
}

#[test]
fn test_certificate_invalid_team_index() {
    setup();
    let output_file = "should-not-exist-certificate.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "certificate",
            "-d", "tests/fixtures/registrations.json",
            "-r", "66a3f1c2e4b0a1b2c3d4e5f6",
            "--team", "5",
            "--member", "0",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing team");
    assert_eq!(output.status.code(), Some(2));
    assert!(!output_dir().join(output_file).exists());
}

#[test]
fn test_certificate_unknown_registration() {
    let output = cargo_bin()
        .args([
            "certificate",
            "-d", "tests/fixtures/registrations.json",
            "-r", "does-not-exist",
            "--team", "0",
            "--member", "0",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_list_newest_first() {
    let output = cargo_bin()
        .args(["list", "-d", "tests/fixtures/registrations.json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "Pending registrations must not be listed: {}", stdout);
    assert!(lines[0].starts_with("2025-07-22"));
    assert!(lines[1].contains("Acme Univ"));
    assert!(lines[1].contains("members: 4"));
}

#[test]
fn test_invalid_data_file() {
    let output = cargo_bin()
        .args([
            "report",
            "-d", "nonexistent.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing data file");
    assert_eq!(output.status.code(), Some(1));
}
