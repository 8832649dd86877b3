//! ArrayQL - compiles array request expressions into MySQL SELECT statements
//!
//! This crate provides:
//! - A request expression tree, readable from JSON
//! - Schema mappings from request properties to tables and columns (YAML)
//! - A SELECT statement builder with table/join/column deduplication
//! - A translator from aggregate-over-array requests to one SELECT

pub mod config;
pub mod request;
pub mod schema;
pub mod statement;
pub mod translator;
