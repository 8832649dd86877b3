use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatementError {
    #[error("Statement already has a FROM table (aliased `{0}`); only one is allowed")]
    MultipleFromTables(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("A join cannot be used as the FROM source")]
    JoinAsFromTable,
}
