use std::{
    io::Write,
    path::Path,
    process::{Command, Output, Stdio},
};

const BASIC: &str = env!("CARGO_BIN_EXE_argtree-basic");
const CONFIG_FILE: &str = env!("CARGO_BIN_EXE_argtree-config-file");
const CONFIG_DIR: &str = env!("CARGO_BIN_EXE_argtree-config-dir");

fn run(bin: &str, home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(bin)
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // the child may exit without reading its input
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());

    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn nested_subcommand_runs_its_handler() {
    let home = tempfile::tempdir().unwrap();
    let output = run(
        BASIC,
        home.path(),
        &["sub1", "sub1.2", "hello", "-q", "a=1", "-q", "b=2"],
        "",
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output), "handler for sub1.2\n");
}

#[test]
fn no_arguments_prints_root_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run(BASIC, home.path(), &[], "");
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("Welcome to my command line interface"));
    assert!(text.contains("Available Commands"));
    assert!(!text.contains("handler for"));
}

#[test]
fn group_without_handler_prints_its_own_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run(BASIC, home.path(), &["sub1"], "");
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("A description of sub1"));
    assert!(text.contains("my_app sub1"));
    assert!(!text.contains("A description of sub2"));
}

#[test]
fn usage_errors_are_reported_by_clap() {
    let home = tempfile::tempdir().unwrap();
    let output = run(BASIC, home.path(), &["sub1", "sub1.2"], "");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("arg1"));
}

#[test]
fn config_init_without_prompt_creates_directory_idempotently() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("my_app");

    for _ in 0..2 {
        let output = run(CONFIG_DIR, home.path(), &["config", "init", "--no-prompt"], "");
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(dir.is_dir());
    }
}

#[test]
fn config_show_prints_path_without_creating_it() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("my_app");
    let output = run(CONFIG_DIR, home.path(), &["config", "show"], "");

    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{}\n", dir.display()));
    assert!(!dir.exists());
}

#[test]
fn declined_prompt_aborts() {
    let home = tempfile::tempdir().unwrap();
    let output = run(CONFIG_DIR, home.path(), &["config", "init"], "n\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Aborted!"));
    assert!(!home.path().join(".config").join("my_app").exists());
}

#[test]
fn accepted_prompt_creates_directory() {
    let home = tempfile::tempdir().unwrap();
    let output = run(CONFIG_DIR, home.path(), &["config", "init"], "yes\n");

    assert!(output.status.success());
    assert!(home.path().join(".config").join("my_app").is_dir());
}

#[test]
fn handler_failure_is_logged_and_help_reprinted() {
    let home = tempfile::tempdir().unwrap();
    let blocker = home.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let target = blocker.join("my_app");
    let output = run(
        CONFIG_DIR,
        home.path(),
        &[
            "--config-dir",
            target.to_str().unwrap(),
            "config",
            "init",
            "--no-prompt",
        ],
        "",
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("creating config directory"));
    assert!(stdout(&output).contains("Welcome to my command line interface"));
}

#[test]
fn parse_failure_hits_the_boundary() {
    let home = tempfile::tempdir().unwrap();
    let output = run(CONFIG_DIR, home.path(), &["--flag-two", "many"], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Available Commands"));
}

#[test]
fn init_saves_flags_that_later_runs_pick_up() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join(".config").join("my_app").join("config.json");

    let output = run(
        CONFIG_FILE,
        home.path(),
        &["--flag-one", "saved", "init", "--no-prompt"],
        "",
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({ "flag_one": "saved", "flag_two": 5 })
    );

    let output = run(CONFIG_FILE, home.path(), &["sub2", "sub2.1"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "handler for sub2.1\n");
}
