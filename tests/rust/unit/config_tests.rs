//! Compiler configuration loading

use std::io::Write;

use arrayql::config::{CliConfig, CompilerConfig, ConfigError};
use tempfile::NamedTempFile;

#[test]
fn test_yaml_config_with_defaults() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "schema_path: schemas/people.yaml")?;

    let config = CompilerConfig::from_yaml_file(file.path())?;
    assert_eq!(config.schema_path, "schemas/people.yaml");
    assert_eq!(config.max_expression_depth, 64);
    Ok(())
}

#[test]
fn test_yaml_config_is_validated() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "schema_path: people.yaml\nmax_expression_depth: 5000")?;

    assert!(matches!(
        CompilerConfig::from_yaml_file(file.path()),
        Err(ConfigError::Validation(_))
    ));
    Ok(())
}

#[test]
fn test_unreadable_yaml_config() {
    assert!(matches!(
        CompilerConfig::from_yaml_file("/nonexistent/arrayql.yaml"),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_parse_error_leaves_cause_to_source() {
    let error = CompilerConfig::from_yaml_file("/nonexistent/arrayql.yaml").unwrap_err();
    assert_eq!(error.to_string(), "Parse error for yaml_file: file read failed");
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_cli_config() -> anyhow::Result<()> {
    let config = CompilerConfig::from_cli(CliConfig {
        schema_path: "schemas/people.yaml".into(),
        max_expression_depth: 12,
    })?;
    assert_eq!(config.max_expression_depth, 12);
    assert_eq!(config.schema_path, "schemas/people.yaml");
    Ok(())
}
