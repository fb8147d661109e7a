use std::process::{Command, Stdio};

fn lj_binary() -> &'static str {
    env!("CARGO_BIN_EXE_lj")
}

fn fixture(name: &str) -> String {
    format!(
        "{}/../lj-translator/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    )
}

fn run_lj(args: &[&str]) -> std::process::Output {
    Command::new(lj_binary())
        .args(args)
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap_or_else(|_| panic!("failed to spawn lj at {}", lj_binary()))
}

#[test]
fn parse_error_is_reported_once_with_failure_status() {
    let output = run_lj(&[&fixture("bad_syntax.lua")]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stderr was: {stderr}");
    assert_eq!(
        stderr.matches("'end' expected").count(),
        1,
        "stderr was: {stderr}"
    );
    assert!(!stderr.contains("ParseError {"), "stderr was: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn translated_file_goes_to_stdout() {
    let output = run_lj(&["--no-runtime", &fixture("counter.lua")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr was: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.starts_with("var _G = globalThis;\nvar __lua = Lua;\n"), "{stdout}");
}
