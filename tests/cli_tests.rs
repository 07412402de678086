use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ssr-buffer"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn ssr-buffer");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for ssr-buffer")
}

const PAYLOAD: &str = r#"{"segments":[
    {"kind":"join_literal","text":"<p>"},
    {"kind":"join_literal","text":"hi "},
    {"kind":"join_expression","expr":"escapeHTML(data.name)"},
    {"kind":"join_literal","text":"</p>"}
]}"#;

#[test]
fn compile_wraps_segments_in_renderer() {
    let output = run_cli(&["compile"], PAYLOAD);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let code = String::from_utf8(output.stdout).unwrap();
    assert!(code.starts_with("function (data) {"));
    assert!(code.contains("var stringifier"));
    assert!(code.contains(
        "html += \"<p>hi \";\nhtml += escapeHTML(data.name);\nhtml += \"</p>\";"
    ));
    assert!(code.trim_end().ends_with("return html;\n}"));
}

#[test]
fn compile_bare_emits_only_segments() {
    let output = run_cli(&["compile", "--bare"], PAYLOAD);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "html += \"<p>hi \";\nhtml += escapeHTML(data.name);\nhtml += \"</p>\";\n"
    );
}

#[test]
fn compile_uses_custom_data_access() {
    let payload = r#"{"segments":[{"kind":"join_data_serialization"}],"data_access":"ctx.data"}"#;
    let output = run_cli(&["compile", "--bare"], payload);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "html += stringifier.any(ctx.data);\n"
    );
}

#[test]
fn compile_stamps_version_and_writes_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("nested").join("renderer.js");

    let output = run_cli(
        &["compile", "--version-stamp", "9.9.9", "--out", out.to_str().unwrap()],
        PAYLOAD,
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let code = std::fs::read_to_string(&out).expect("renderer written");
    assert!(code.contains("var $version = '9.9.9';"));
    assert!(!code.contains("##version##"));
}

#[test]
fn compile_rejects_bad_version() {
    let output = run_cli(&["compile", "--version-stamp", "x'y"], PAYLOAD);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ssr-buffer]"));
    assert!(stderr.contains("Invalid version identifier"));
}

#[test]
fn compile_reports_empty_expression() {
    let payload = r#"{"segments":[{"kind":"join_expression","expr":"  "}]}"#;
    let output = run_cli(&["compile"], payload);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to linearize segments"));
    assert!(stderr.contains("Expression source must be non-empty"));
}

#[test]
fn compile_rejects_unknown_fields() {
    let output = run_cli(&["compile"], r#"{"segments":[],"extra":1}"#);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid input JSON"));
}

#[test]
fn empty_stdin_is_an_error() {
    let output = run_cli(&["compile"], "  \n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("stdin payload is empty"));
}

#[test]
fn stringify_prints_literal() {
    let output = run_cli(&["stringify"], r#"{"b":[1,true,null],"a":"x\"y"}"#);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{\"b\":[1,true,null],\"a\":\"x\\\"y\"}\n"
    );
}
