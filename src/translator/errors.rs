use thiserror::Error;

use crate::schema::SchemaError;
use crate::statement::StatementError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslatorError {
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Schema error: {0}")]
    Schema(SchemaError),

    #[error(transparent)]
    Statement(#[from] StatementError),
}

impl From<SchemaError> for TranslatorError {
    fn from(error: SchemaError) -> Self {
        match error {
            SchemaError::UnknownProperty { .. } => TranslatorError::UnknownProperty(error.to_string()),
            other => TranslatorError::Schema(other),
        }
    }
}

/// Failure of a whole compilation, carrying the innermost diagnosis.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Failed to compile `{request}`")]
    CompileFailure {
        request: String,
        source: TranslatorError,
    },
}

impl CompileError {
    pub fn cause(&self) -> &TranslatorError {
        match self {
            CompileError::CompileFailure { source, .. } => source,
        }
    }
}
