use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::config::{PropertyConfig, SchemaConfig};
use super::errors::SchemaError;
use super::{Binding, PropertyResolver, ValueType};
use crate::statement::to_sql::quote_identifier;
use crate::statement::JoinCondition;

#[derive(Debug, Clone)]
struct Entity {
    key: String,
    properties: HashMap<String, Binding>,
}

/// A validated schema mapping.
#[derive(Debug, Clone)]
pub struct SchemaMapping {
    roots: HashMap<String, Binding>,
    entities: HashMap<String, Entity>,
}

impl SchemaMapping {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let config: SchemaConfig =
            serde_yaml::from_str(yaml).map_err(|e| SchemaError::Yaml(e.to_string()))?;
        Self::from_config(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Checks cross references and parses join conditions.
    pub fn from_config(config: SchemaConfig) -> Result<Self, SchemaError> {
        let mut roots = HashMap::new();
        for (name, root) in config.roots {
            if !config.entities.contains_key(&root.entity) {
                return Err(SchemaError::UnknownEntity(root.entity));
            }
            roots.insert(
                name,
                Binding::Relation {
                    entity: root.entity,
                    table: root.table,
                    join: None,
                    is_optional: false,
                    is_many: true,
                },
            );
        }

        let mut entities = HashMap::new();
        for (entity_name, entity) in &config.entities {
            let mut properties = HashMap::new();
            for (property, mapping) in &entity.properties {
                let binding = match mapping {
                    PropertyConfig::Value {
                        column,
                        value_type,
                        optional,
                    } => Binding::Value {
                        column: normalize_column(column),
                        value_type: *value_type,
                        is_optional: *optional,
                    },
                    PropertyConfig::Relation {
                        entity: target,
                        table,
                        join,
                        optional,
                        many,
                    } => {
                        if !config.entities.contains_key(target) {
                            return Err(SchemaError::UnknownEntity(target.clone()));
                        }
                        Binding::Relation {
                            entity: target.clone(),
                            table: table.clone(),
                            join: Some(parse_join(entity_name, property, join)?),
                            is_optional: *optional,
                            is_many: *many,
                        }
                    }
                };
                properties.insert(property.clone(), binding);
            }

            entities.insert(
                entity_name.clone(),
                Entity {
                    key: normalize_column(&entity.key),
                    properties,
                },
            );
        }

        log::debug!(
            "Loaded schema mapping{}: {} roots, {} entities",
            config
                .name
                .as_deref()
                .map(|name| format!(" '{}'", name))
                .unwrap_or_default(),
            roots.len(),
            entities.len()
        );

        Ok(SchemaMapping { roots, entities })
    }

    pub fn has_property(&self, entity: &str, property: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|e| e.properties.contains_key(property))
    }

    fn entity(&self, name: &str) -> Result<&Entity, SchemaError> {
        self.entities
            .get(name)
            .ok_or_else(|| SchemaError::UnknownEntity(name.to_string()))
    }
}

impl PropertyResolver for SchemaMapping {
    fn resolve(&self, context: Option<&str>, segment: &str) -> Result<Binding, SchemaError> {
        let found = match context {
            None => self.roots.get(segment),
            Some(entity) => self.entity(entity)?.properties.get(segment),
        };

        found.cloned().ok_or_else(|| SchemaError::UnknownProperty {
            context: match context {
                None => "the root scope".to_string(),
                Some(entity) => format!("entity '{}'", entity),
            },
            segment: segment.to_string(),
        })
    }

    fn key_column(&self, entity: &str) -> Result<String, SchemaError> {
        Ok(self.entity(entity)?.key.clone())
    }
}

/// Quotes a bare identifier; leaves SQL expressions untouched.
fn normalize_column(column: &str) -> String {
    let bare = !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if bare {
        quote_identifier(column)
    } else {
        column.to_string()
    }
}

fn parse_join(entity: &str, property: &str, template: &str) -> Result<JoinCondition, SchemaError> {
    if template.trim().is_empty() {
        return Err(SchemaError::MissingJoin {
            entity: entity.to_string(),
            property: property.to_string(),
        });
    }
    // Only one placeholder is substituted per token.
    let ambiguous = template.split_whitespace().any(|token| {
        token.contains(JoinCondition::LEFT_PLACEHOLDER)
            && token.contains(JoinCondition::SELF_PLACEHOLDER)
    });
    if ambiguous {
        return Err(SchemaError::AmbiguousJoinCondition {
            property: property.to_string(),
            template: template.to_string(),
        });
    }

    let condition = JoinCondition::parse(template);
    if !condition.references_aliases() {
        return Err(SchemaError::InvalidJoinCondition {
            property: property.to_string(),
            template: template.to_string(),
        });
    }
    Ok(condition)
}
