//! Schema mapping loading and validation

use std::io::Write;

use arrayql::schema::{Binding, PropertyResolver, SchemaError, SchemaMapping, ValueType};
use tempfile::NamedTempFile;

#[test]
fn test_load_bundled_schema() -> anyhow::Result<()> {
    let schema = SchemaMapping::from_yaml_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/schemas/people.yaml"
    ))?;

    assert!(schema.has_property("Person", "Pets"));
    assert!(schema.has_property("Pet", "Owner"));
    assert_eq!(schema.key_column("Pet")?, "`Id`");
    match schema.resolve(Some("Person"), "Pets")? {
        Binding::Relation {
            entity,
            join: Some(join),
            is_many,
            ..
        } => {
            assert_eq!(entity, "Pet");
            assert_eq!(join.to_string(), "`0`.`Id` = `1`.`OwnerId`");
            assert!(is_many);
        }
        other => panic!("expected a relation, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_load_from_temp_file() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        "roots:\n  Items: {{ entity: Item, table: items }}\nentities:\n  Item:\n    key: id\n    properties:\n      price: {{ column: price, type: float }}"
    )?;

    let schema = SchemaMapping::from_yaml_file(file.path())?;
    assert_eq!(
        schema.resolve(Some("Item"), "price")?,
        Binding::Value {
            column: "`price`".to_string(),
            value_type: ValueType::Float,
            is_optional: false,
        }
    );
    Ok(())
}

#[test]
fn test_missing_file() {
    let result = SchemaMapping::from_yaml_file("/nonexistent/schema.yaml");
    assert!(matches!(result, Err(SchemaError::Io { .. })));
}

#[test]
fn test_relation_with_empty_join() {
    let yaml = r#"
roots:
  People: { entity: Person, table: People }
entities:
  Person:
    key: Id
    properties:
      Friends: { entity: Person, table: People, join: "  " }
"#;
    assert_eq!(
        SchemaMapping::from_yaml_str(yaml).unwrap_err(),
        SchemaError::MissingJoin {
            entity: "Person".to_string(),
            property: "Friends".to_string(),
        }
    );
}
