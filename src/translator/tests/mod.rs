
use crate::request::ast::Expression;
use crate::schema::SchemaMapping;
use crate::statement::SequentialTags;
use crate::translator::{Translator, TranslatorError};

pub(super) const PEOPLE_SCHEMA: &str = r#"
name: people
roots:
  People: { entity: Person, table: People }
  Pets: { entity: Pet, table: Pets }
entities:
  Person:
    key: Id
    properties:
      firstName: { column: First, type: string }
      lastName: { column: Last, type: string }
      name: { column: "CONCAT(`First`, ' ', `Last`)", type: string }
      age: { column: Age, type: integer }
      height: { column: Height, type: float }
      active: { column: Active, type: boolean }
      Address:
        entity: Address
        table: Addresses
        join: "`0`.`AddressId` = `1`.`Id`"
      Employer:
        entity: Company
        table: Companies
        join: "`0`.`EmployerId` = `1`.`Id`"
        optional: true
      Pets:
        entity: Pet
        table: Pets
        join: "`0`.`Id` = `1`.`OwnerId`"
        optional: true
        many: true
  Pet:
    key: Id
    properties:
      name: { column: Name, type: string }
      age: { column: Age, type: integer }
  Address:
    key: Id
    properties:
      city: { column: City, type: string }
  Company:
    key: Id
    properties:
      name: { column: Name, type: string }
"#;

pub(super) fn schema() -> SchemaMapping {
    SchemaMapping::from_yaml_str(PEOPLE_SCHEMA).unwrap()
}

pub(super) fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::function(name, arguments)
}

pub(super) fn prop(path: &str) -> Expression {
    Expression::property(path)
}

pub(super) fn param(name: &str) -> Expression {
    Expression::parameter(name)
}

/// Compiles with fresh sequential tags.
pub(super) fn compile(request: &Expression) -> Result<String, TranslatorError> {
    let schema = schema();
    let tags = SequentialTags::new();
    let translator = Translator::new(&schema, &tags);
    let select = translator.compile_select_expression(request)?;
    Ok(select.render()?)
}

pub(super) fn unsupported(result: Result<String, TranslatorError>) -> String {
    match result {
        Err(TranslatorError::UnsupportedExpression(message)) => message,
        other => panic!("expected UnsupportedExpression, got {:?}", other),
    }
}
