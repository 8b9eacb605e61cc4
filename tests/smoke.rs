use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("call-insights").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn generate_writes_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calls_dataset.csv");
    let mut cmd = Command::cargo_bin("call-insights").expect("binary exists");
    cmd.args(["generate", "--seed", "3", "--output"])
        .arg(&path)
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("id,cleaned_text,labels"));
}
