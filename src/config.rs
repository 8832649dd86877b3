use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 64;
pub const DEFAULT_SCHEMA_PATH: &str = "schema.yaml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Schema mapping YAML file
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: String,

    /// Deepest request tree accepted before compilation starts
    #[validate(range(
        min = 1,
        max = 1000,
        message = "Max expression depth must be between 1 and 1000"
    ))]
    pub max_expression_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            schema_path: env::var("ARRAYQL_SCHEMA")
                .unwrap_or_else(|_| DEFAULT_SCHEMA_PATH.to_string()),
            max_expression_depth: parse_env_var(
                "ARRAYQL_MAX_DEPTH",
                &DEFAULT_MAX_EXPRESSION_DEPTH.to_string(),
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            schema_path: cli.schema_path.display().to_string(),
            max_expression_depth: cli.max_expression_depth,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub schema_path: PathBuf,
    pub max_expression_depth: usize,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
