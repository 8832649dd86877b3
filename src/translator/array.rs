use crate::request::ast::{Expression, FunctionCall};
use crate::statement::TableId;

use super::errors::TranslatorError;
use super::expression::Value;
use super::path::{Cursor, PathTarget};
use super::Compilation;

/// The element source of a compiled array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayElement {
    pub cursor: Cursor,
    /// Set when the elements are leaf values rather than rows.
    pub value: Option<Value>,
}

/// Clauses gathered while walking an array chain, applied in clause order
/// once the chain is compiled.
#[derive(Debug, Default)]
pub struct PendingClauses {
    pub filters: Vec<Value>,
    pub order_by: Option<(TableId, String, bool)>,
    pub limit: Option<(Value, Value)>,
}

fn arity_error(call: &FunctionCall, arity: usize) -> TranslatorError {
    TranslatorError::UnsupportedExpression(format!(
        "`{}` takes {} argument(s), got {}",
        call.name,
        arity,
        call.arguments.len()
    ))
}

impl Compilation<'_, '_> {
    pub(super) fn compile_array_expression(
        &mut self,
        expression: &Expression,
    ) -> Result<ArrayElement, TranslatorError> {
        match expression {
            Expression::Property(path) => match self.resolve_path(path, None)? {
                PathTarget::Collection(cursor) => Ok(ArrayElement {
                    cursor,
                    value: None,
                }),
                PathTarget::Value {
                    cursor,
                    column,
                    value_type,
                } => {
                    let sql = self.select.qualify(cursor.table, &column)?;
                    Ok(ArrayElement {
                        cursor,
                        value: Some(Value::atom(sql, value_type)),
                    })
                }
            },
            Expression::Function(call) => match call.name.as_str() {
                "filter" => self.compile_filter(call),
                "sort" => self.compile_sort(call),
                "slice" => self.compile_slice(call),
                _ => Err(TranslatorError::UnsupportedExpression(format!(
                    "`{}` does not produce an array",
                    call
                ))),
            },
            other => Err(TranslatorError::UnsupportedExpression(format!(
                "`{}` does not produce an array",
                other
            ))),
        }
    }

    fn compile_filter(&mut self, call: &FunctionCall) -> Result<ArrayElement, TranslatorError> {
        let [array, predicate] = call.arguments.as_slice() else {
            return Err(arity_error(call, 2));
        };
        let element = self.compile_array_expression(array)?;
        if self.pending.limit.is_some() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "cannot filter the sliced array in `{}`",
                call
            )));
        }

        let condition = self.compile_value(predicate, &element.cursor)?;
        if !condition.value_type.is_boolean() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "filter condition `{}` is not boolean",
                predicate
            )));
        }
        log::debug!("WHERE term: {}", condition.sql);
        self.pending.filters.push(condition);
        Ok(element)
    }

    fn compile_sort(&mut self, call: &FunctionCall) -> Result<ArrayElement, TranslatorError> {
        let [array, key] = call.arguments.as_slice() else {
            return Err(arity_error(call, 2));
        };
        let element = self.compile_array_expression(array)?;
        if self.pending.limit.is_some() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "cannot sort the sliced array in `{}`",
                call
            )));
        }
        if self.pending.order_by.is_some() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "array in `{}` is already sorted",
                call
            )));
        }

        let (table, column, ascending) = self.compile_sort_key(key, &element.cursor, true)?;
        self.pending.order_by = Some((table, column, ascending));
        Ok(element)
    }

    /// A property path, optionally under `not(...)` which flips the direction.
    fn compile_sort_key(
        &mut self,
        key: &Expression,
        cursor: &Cursor,
        ascending: bool,
    ) -> Result<(TableId, String, bool), TranslatorError> {
        match key {
            Expression::Function(call) if call.name == "not" && call.arguments.len() == 1 => {
                self.compile_sort_key(&call.arguments[0], cursor, !ascending)
            }
            Expression::Property(path) => match self.resolve_path(path, Some(cursor))? {
                PathTarget::Value { cursor, column, .. } => Ok((cursor.table, column, ascending)),
                PathTarget::Collection(_) => Err(TranslatorError::UnsupportedExpression(format!(
                    "cannot sort by the collection `{}`",
                    path
                ))),
            },
            other => Err(TranslatorError::UnsupportedExpression(format!(
                "sort key `{}` must be a property",
                other
            ))),
        }
    }

    fn compile_slice(&mut self, call: &FunctionCall) -> Result<ArrayElement, TranslatorError> {
        let [array, start, length] = call.arguments.as_slice() else {
            return Err(arity_error(call, 3));
        };
        let element = self.compile_array_expression(array)?;
        if self.pending.limit.is_some() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "array in `{}` is already sliced",
                call
            )));
        }

        let start = self.compile_numeric_constant(start)?;
        let length = self.compile_numeric_constant(length)?;
        self.pending.limit = Some((start, length));
        Ok(element)
    }

    /// Applies the gathered clauses: WHERE, ORDER BY, LIMIT.
    pub(super) fn flush_clauses(&mut self) -> Result<(), TranslatorError> {
        let pending = std::mem::take(&mut self.pending);

        if let Some(condition) = Value::conjunction(pending.filters) {
            self.select.set_where(condition);
        }
        if let Some((table, column, ascending)) = pending.order_by {
            self.select.set_order_by(table, &column, ascending)?;
        }
        if let Some((offset, count)) = pending.limit {
            self.select.set_limit(offset, count);
        }
        Ok(())
    }
}
