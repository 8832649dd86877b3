//! Compiles a request expression tree into one MySQL SELECT.
//!
//! The root must be an aggregate (`average`, `count`, `max`, `min`, `sum`)
//! over an array chain built from property paths, `filter`, `sort` and
//! `slice`. Each node of the chain is matched against the known shapes in
//! order; clauses are collected while walking and applied to the statement
//! once the chain is complete, so WHERE, ORDER BY and LIMIT always land in
//! clause order whatever the nesting.

pub mod array;
pub mod errors;
pub mod expression;
pub mod function_registry;
pub mod path;

#[cfg(test)]
mod tests;

use crate::config::{CompilerConfig, DEFAULT_MAX_EXPRESSION_DEPTH};
use crate::request::ast::{Expression, FunctionCall};
use crate::schema::PropertyResolver;
use crate::statement::{Select, TableId, TagGenerator};

use array::PendingClauses;
pub use errors::{CompileError, TranslatorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Average,
    Count,
    Max,
    Min,
    Sum,
}

impl Aggregate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "average" => Some(Aggregate::Average),
            "count" => Some(Aggregate::Count),
            "max" => Some(Aggregate::Max),
            "min" => Some(Aggregate::Min),
            "sum" => Some(Aggregate::Sum),
            _ => None,
        }
    }

    pub fn sql_name(self) -> &'static str {
        match self {
            Aggregate::Average => "AVG",
            Aggregate::Count => "COUNT",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Sum => "SUM",
        }
    }

    fn needs_numbers(self) -> bool {
        matches!(self, Aggregate::Average | Aggregate::Sum)
    }

    /// Whether repeated input rows change the result.
    fn counts_duplicates(self) -> bool {
        !matches!(self, Aggregate::Max | Aggregate::Min)
    }
}

pub struct Translator<'a> {
    schema: &'a dyn PropertyResolver,
    tags: &'a dyn TagGenerator,
    max_depth: usize,
}

impl<'a> Translator<'a> {
    pub fn new(schema: &'a dyn PropertyResolver, tags: &'a dyn TagGenerator) -> Self {
        Translator {
            schema,
            tags,
            max_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }

    pub fn with_config(
        schema: &'a dyn PropertyResolver,
        tags: &'a dyn TagGenerator,
        config: &CompilerConfig,
    ) -> Self {
        Translator::new(schema, tags).with_max_depth(config.max_expression_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compiles `request` into SQL text.
    pub fn translate(&self, request: &Expression) -> Result<String, CompileError> {
        log::debug!("Translating {}", request);
        self.compile_select_expression(request)
            .and_then(|select| select.render().map_err(TranslatorError::from))
            .map_err(|source| {
                log::debug!("Translation failed: {}", source);
                CompileError::CompileFailure {
                    request: request.to_string(),
                    source,
                }
            })
    }

    /// Compiles `request` into a statement builder without rendering it.
    pub fn compile_select_expression(
        &self,
        request: &Expression,
    ) -> Result<Select<'a>, TranslatorError> {
        let depth = request.depth();
        if depth > self.max_depth {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "expression nesting depth {} exceeds the limit of {}",
                depth, self.max_depth
            )));
        }

        let Expression::Function(call) = request else {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "`{}` is not a select expression",
                request
            )));
        };

        let mut compilation = Compilation {
            schema: self.schema,
            select: Select::new(self.tags),
            pending: PendingClauses::default(),
            to_many: Vec::new(),
        };

        match call.name.as_str() {
            "map" => Err(TranslatorError::NotImplemented(
                "map projections".to_string(),
            )),
            "delete" | "insert" | "set" => Err(TranslatorError::NotImplemented(format!(
                "`{}` requests",
                call.name
            ))),
            name => match Aggregate::from_name(name) {
                Some(aggregate) => {
                    compilation.compile_aggregate(aggregate, call)?;
                    Ok(compilation.select)
                }
                None => Err(TranslatorError::UnsupportedExpression(format!(
                    "`{}` is not a select expression",
                    call
                ))),
            },
        }
    }
}

/// State of one compilation: the statement being built and the clauses
/// waiting to be applied.
pub(crate) struct Compilation<'s, 't> {
    schema: &'s dyn PropertyResolver,
    select: Select<'t>,
    pending: PendingClauses,
    /// Slots joined through a to-many relation, in creation order.
    to_many: Vec<TableId>,
}

impl Compilation<'_, '_> {
    /// True when a to-many join was added after `table`, so each of its
    /// rows may appear more than once in the joined result.
    fn fans_out(&self, table: TableId) -> bool {
        self.to_many.iter().any(|&id| id > table)
    }

    fn compile_aggregate(
        &mut self,
        aggregate: Aggregate,
        call: &FunctionCall,
    ) -> Result<(), TranslatorError> {
        let [array] = call.arguments.as_slice() else {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "`{}` takes exactly one array",
                call.name
            )));
        };

        let element = self.compile_array_expression(array)?;
        self.flush_clauses()?;

        let fans_out = self.fans_out(element.cursor.table);
        let column = match element.value {
            Some(value) => {
                if aggregate.needs_numbers() && !value.value_type.is_numeric() {
                    return Err(TranslatorError::UnsupportedExpression(format!(
                        "`{}` needs numeric values",
                        call
                    )));
                }
                if fans_out && aggregate.counts_duplicates() {
                    return Err(TranslatorError::UnsupportedExpression(format!(
                        "`{}` would count values repeated by a to-many join",
                        call
                    )));
                }
                value.sql
            }
            None if aggregate == Aggregate::Count => {
                let key = self.schema.key_column(&element.cursor.entity)?;
                let key = self.select.qualify(element.cursor.table, &key)?;
                if fans_out {
                    format!("DISTINCT {}", key)
                } else {
                    key
                }
            }
            None => {
                return Err(TranslatorError::UnsupportedExpression(format!(
                    "`{}` needs an array of values, not of {} rows",
                    call, element.cursor.entity
                )))
            }
        };

        let id = self
            .select
            .add_column(format!("{}({})", aggregate.sql_name(), column));
        log::debug!("Projected {} as column {}", aggregate.sql_name(), id);
        Ok(())
    }
}
