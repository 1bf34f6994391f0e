//! End-to-end tests for the platecad binary.

use std::fs;
use std::process::Command;

/// Path to the platecad binary
fn platecad_bin() -> &'static str {
    env!("CARGO_BIN_EXE_platecad")
}

fn write_config(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write config");
    path
}

#[test]
fn test_draw_basic_succeeds() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_config(
        temp.path(),
        "config.json",
        r#"{"layout":[["Esc","Q","W"],["A","S",{"w":2},"D"]]}"#,
    );
    let out_dir = temp.path().join("out");

    let output = Command::new(platecad_bin())
        .args([
            "--config",
            config.to_str().unwrap(),
            "--hash",
            "basic",
            "--dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to execute platecad");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let svg = out_dir.join("basic_switch.svg");
    assert!(svg.exists(), "missing {}", svg.display());
    let content = fs::read_to_string(&svg).unwrap();
    assert!(content.contains("<polygon"));
}

#[test]
fn test_draw_sandwich_writes_five_plates() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_config(
        temp.path(),
        "config.json",
        r#"{
            "case": {"case-type":"sandwich","mount-holes-num":4,"mount-holes-size":3,"mount-holes-edge":6},
            "top-padding":9,"left-padding":9,"right-padding":9,"bottom-padding":9,
            "fillet":3,
            "layout":[["7","8","9"],["4","5","6"],["1","2","3"]]
        }"#,
    );
    let out_dir = temp.path().join("out");

    let output = Command::new(platecad_bin())
        .args([
            "--config",
            config.to_str().unwrap(),
            "--hash",
            "pad",
            "--dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to execute platecad");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    for plate in ["switch", "open", "closed", "top", "bottom"] {
        assert!(
            out_dir.join(format!("pad_{plate}.svg")).exists(),
            "missing plate {plate}"
        );
    }
}

#[test]
fn test_layout_file_overrides_config_layout() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_config(temp.path(), "config.json", r#"{"layout":[["A"]]}"#);
    let layout = write_config(temp.path(), "layout.json", r#"[["A","B","C","D","E"]]"#);
    let out_dir = temp.path().join("out");

    let output = Command::new(platecad_bin())
        .args([
            "--config",
            config.to_str().unwrap(),
            "--layout",
            layout.to_str().unwrap(),
            "--hash",
            "wide",
            "--dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to execute platecad");

    assert_eq!(output.status.code(), Some(0));
    let content = fs::read_to_string(out_dir.join("wide_switch.svg")).unwrap();
    // Five keys wide: the canvas is wider than five key units.
    let width_attr = content
        .split("width=\"")
        .nth(1)
        .and_then(|rest| rest.split("mm").next())
        .and_then(|v| v.parse::<f64>().ok())
        .expect("svg width attribute");
    assert!(width_attr > 5.0 * 19.05, "width {width_attr}");
}

#[test]
fn test_missing_config_fails() {
    let output = Command::new(platecad_bin())
        .args(["--config", "/nonexistent/config.json"])
        .output()
        .expect("failed to execute platecad");
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_malformed_layout_fails() {
    let temp = tempfile::tempdir().unwrap();
    let config = write_config(
        temp.path(),
        "config.json",
        r#"{"layout":[["A"],"not-a-row"]}"#,
    );
    let output = Command::new(platecad_bin())
        .args(["--config", config.to_str().unwrap(), "--dir", temp.path().to_str().unwrap()])
        .output()
        .expect("failed to execute platecad");
    assert_ne!(output.status.code(), Some(0));
}
