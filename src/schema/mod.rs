//! Schema mapping: how request property paths bind to tables and columns.

pub mod config;
pub mod errors;
pub mod mapping;

use serde::{Deserialize, Serialize};

use crate::statement::JoinCondition;

pub use config::{EntityConfig, PropertyConfig, RootConfig, SchemaConfig};
pub use errors::SchemaError;
pub use mapping::SchemaMapping;

/// Declared type of a mapped value, used for operator selection and checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    #[default]
    Unknown,
}

impl ValueType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Float | ValueType::Unknown)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, ValueType::Boolean | ValueType::Unknown)
    }
}

/// What one property-path segment binds to.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A leaf value; `column` is unqualified. `is_optional` only records
    /// that the column is nullable, it never changes the generated SQL.
    Value {
        column: String,
        value_type: ValueType,
        is_optional: bool,
    },
    /// A hop to another table. `join` is `None` only for root collections.
    Relation {
        entity: String,
        table: String,
        join: Option<JoinCondition>,
        is_optional: bool,
        is_many: bool,
    },
}

impl Binding {
    pub fn is_optional(&self) -> bool {
        match self {
            Binding::Value { is_optional, .. } | Binding::Relation { is_optional, .. } => {
                *is_optional
            }
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Binding::Relation { is_many: true, .. })
    }
}

/// Resolves property-path segments against a schema.
///
/// `context` is `None` at the root scope and the entity name otherwise.
pub trait PropertyResolver {
    fn resolve(&self, context: Option<&str>, segment: &str) -> Result<Binding, SchemaError>;

    /// The row-identifying column of an entity, unqualified.
    fn key_column(&self, entity: &str) -> Result<String, SchemaError>;
}
