//! The `arrayql` binary

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

const SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/schemas/people.yaml");

fn request_file(json: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    Ok(file)
}

#[test]
fn test_cli_prints_sql() -> anyhow::Result<()> {
    let request = request_file(r#"{"function": {"name": "count", "arguments": [{"property": ["People"]}]}}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_arrayql"))
        .args(["--schema", SCHEMA, "--request"])
        .arg(request.path())
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "SELECT\n\tCOUNT(`0`.`Id`) AS `0`\nFROM `People` AS `0`\n"
    );
    Ok(())
}

#[test]
fn test_cli_reports_compile_failure() -> anyhow::Result<()> {
    let request = request_file(r#"{"function": {"name": "count", "arguments": [{"property": ["Robots"]}]}}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_arrayql"))
        .args(["--schema", SCHEMA, "--request"])
        .arg(request.path())
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr)?;
    let error_line = stderr.lines().find(|line| line.starts_with("Error: ")).unwrap();
    assert_eq!(error_line, "Error: Failed to compile `count(Robots)`");
    let causes: Vec<_> = stderr.lines().filter(|line| line.contains("caused by:")).collect();
    assert_eq!(causes.len(), 1);
    assert_eq!(stderr.matches("'Robots'").count(), 1);
    Ok(())
}

#[test]
fn test_cli_rejects_invalid_depth() -> anyhow::Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_arrayql"))
        .args(["--schema", SCHEMA, "--max-depth", "0", "--request", "-"])
        .env_remove("ARRAYQL_MAX_DEPTH")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[test]
fn test_cli_reads_schema_from_environment() -> anyhow::Result<()> {
    let request = request_file(r#"{"function": {"name": "count", "arguments": [{"property": ["Pets"]}]}}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_arrayql"))
        .env("ARRAYQL_SCHEMA", SCHEMA)
        .env_remove("ARRAYQL_MAX_DEPTH")
        .arg("--request")
        .arg(request.path())
        .output()?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("FROM `Pets` AS `0`"));
    Ok(())
}

#[test]
fn test_cli_config_file_limits_depth() -> anyhow::Result<()> {
    let request = request_file(r#"{"function": {"name": "count", "arguments": [{"property": ["People"]}]}}"#)?;
    let mut config = NamedTempFile::new()?;
    writeln!(config, "schema_path: {}\nmax_expression_depth: 1", SCHEMA)?;

    let output = Command::new(env!("CARGO_BIN_EXE_arrayql"))
        .arg("--config")
        .arg(config.path())
        .arg("--request")
        .arg(request.path())
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("exceeds the limit of 1"));
    Ok(())
}
