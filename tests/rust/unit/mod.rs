//! Unit tests - public API of the statement builder, schema loading and config
//!
//! These tests need no database; they exercise one component at a time.

mod config_tests;
mod schema_loading_tests;
mod statement_builder_tests;
