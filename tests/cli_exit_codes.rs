use std::path::Path;
use std::process::{Command, Output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

const USAGE_LINE: &str = "Usage: sqlcrew --config config.yaml";

fn sqlcrew(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlcrew"))
        .current_dir(cwd)
        .args(args)
        // keep the subprocess off any real API key in the environment
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .expect("command should execute")
}

fn write_config(dir: &Path) {
    std::fs::write(
        dir.join("config.yaml"),
        "mcp:\n  url: http://127.0.0.1:1\ndatabase:\n  name: sales\n",
    )
    .expect("config should be writable");
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn missing_arguments_print_usage_and_exit_1() {
    let temp = tempfile::TempDir::new().expect("temp dir should be creatable");

    let output = sqlcrew(temp.path(), &[]);

    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    assert_eq!(stdout(&output).trim_end(), USAGE_LINE);
}

#[test]
fn unknown_flag_prints_usage_and_exits_1() {
    let temp = tempfile::TempDir::new().expect("temp dir should be creatable");

    let output = sqlcrew(temp.path(), &["--config", "config.yaml", "--bogus"]);

    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    assert_eq!(stdout(&output).trim_end(), USAGE_LINE);
}

#[test]
fn help_exits_0() {
    let temp = tempfile::TempDir::new().expect("temp dir should be creatable");

    let output = sqlcrew(temp.path(), &["--help"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    assert!(stdout(&output).contains("--config"));
}

#[test]
fn no_procedure_file_exits_1_without_outputs() {
    let temp = tempfile::TempDir::new().expect("temp dir should be creatable");
    write_config(temp.path());
    let inputs = temp.path().join("inputs");
    std::fs::create_dir(&inputs).expect("inputs dir should be creatable");
    std::fs::write(inputs.join("q.sql"), "SELECT 1;").expect("query should be writable");

    let output = sqlcrew(temp.path(), &["--config", "config.yaml"]);

    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    assert_eq!(
        stdout(&output).trim_end(),
        "No procedure SQL file found in inputs/."
    );
    assert!(!temp.path().join("outputs").exists());
}

#[test]
fn unreadable_config_exits_1_with_error_on_stderr() {
    let temp = tempfile::TempDir::new().expect("temp dir should be creatable");

    let output = sqlcrew(temp.path(), &["--config", "missing.yaml"]);

    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr was: {stderr}");
    assert!(stderr.contains("missing.yaml"), "stderr was: {stderr}");
    assert!(!temp.path().join("outputs").exists());
}
