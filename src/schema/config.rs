//! YAML form of a schema mapping.
//!
//! ```yaml
//! roots:
//!   People: { entity: Person, table: People }
//! entities:
//!   Person:
//!     key: Id
//!     properties:
//!       name: { column: "CONCAT(`First`, ' ', `Last`)", type: string }
//!       age: { column: Age, type: integer }
//!       Pets:
//!         entity: Pet
//!         table: Pets
//!         join: "`0`.`Id` = `1`.`OwnerId`"
//!         optional: true
//!         many: true
//! ```
//!
//! Columns are SQL expressions over backticked identifiers; a bare identifier
//! such as `Age` is quoted on load. In a join, `` `0` `` is the alias of the
//! table being joined from and `` `1` `` the alias of the joined table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ValueType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub roots: HashMap<String, RootConfig>,
    #[serde(default)]
    pub entities: HashMap<String, EntityConfig>,
}

/// A top-level collection: a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    pub entity: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Column identifying one row, counted by `count` over a collection.
    pub key: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyConfig {
    Relation {
        entity: String,
        table: String,
        join: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        many: bool,
    },
    Value {
        column: String,
        #[serde(default, rename = "type")]
        value_type: ValueType,
        /// Marks a nullable column. Informational: compilation does not read it.
        #[serde(default)]
        optional: bool,
    },
}
