//! The request expression tree consumed by the translator.
//!
//! Producing the tree from request text is the job of an upstream parser; this
//! crate accepts it already typed (or deserialized from JSON).

pub mod ast;

pub use ast::{Expression, FunctionCall, Literal, PropertyPath};
