use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse schema YAML: {0}")]
    Yaml(String),

    #[error("Unknown entity '{0}' (declare it under `entities`)")]
    UnknownEntity(String),

    #[error("Relation '{property}' of entity '{entity}' has an empty join condition")]
    MissingJoin { entity: String, property: String },

    #[error("Join condition '{template}' of '{property}' references neither `0` nor `1`")]
    InvalidJoinCondition { property: String, template: String },

    #[error(
        "Join condition '{template}' of '{property}' has `0` and `1` in one token; separate them with spaces"
    )]
    AmbiguousJoinCondition { property: String, template: String },

    #[error("Unknown property '{segment}' in {context}")]
    UnknownProperty { context: String, segment: String },
}
