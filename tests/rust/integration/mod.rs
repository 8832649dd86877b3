//! Integration tests - whole compilations against the bundled schema
//!
//! These tests drive requests from the expression tree (or its JSON form)
//! through the translator to rendered SQL, and the `arrayql` binary end to end.

mod cli_tests;
mod compile_tests;
mod nested_statement_tests;

use arrayql::schema::SchemaMapping;

pub fn people_schema() -> SchemaMapping {
    SchemaMapping::from_yaml_file(concat!(env!("CARGO_MANIFEST_DIR"), "/schemas/people.yaml"))
        .expect("bundled schema loads")
}
