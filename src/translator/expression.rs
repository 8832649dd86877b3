use crate::request::ast::{Expression, FunctionCall, Literal};
use crate::schema::ValueType;
use crate::statement::ToSql;

use super::errors::TranslatorError;
use super::function_registry::{self, FunctionMapping, ResultType, SqlForm};
use super::path::{Cursor, PathTarget};
use super::Compilation;

/// A compiled scalar sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub sql: String,
    pub value_type: ValueType,
    /// Whether the SQL needs parentheses when used as an operand.
    compound: bool,
}

impl Value {
    pub fn atom(sql: impl Into<String>, value_type: ValueType) -> Self {
        Value {
            sql: sql.into(),
            value_type,
            compound: false,
        }
    }

    pub fn compound(sql: impl Into<String>, value_type: ValueType) -> Self {
        Value {
            sql: sql.into(),
            value_type,
            compound: true,
        }
    }

    pub fn as_operand(&self) -> String {
        if self.compound {
            format!("({})", self.sql)
        } else {
            self.sql.clone()
        }
    }

    /// ANDs conditions together, or returns the only one unchanged.
    pub fn conjunction(mut conditions: Vec<Value>) -> Option<Value> {
        if conditions.len() <= 1 {
            return conditions.pop();
        }
        let sql = conditions
            .iter()
            .map(Value::as_operand)
            .collect::<Vec<_>>()
            .join(" AND ");
        Some(Value::compound(sql, ValueType::Boolean))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> String {
        self.sql.clone()
    }
}

pub fn parameter(name: &str) -> Result<Value, TranslatorError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(TranslatorError::UnsupportedExpression(format!(
            "invalid parameter name '{}'",
            name
        )));
    }
    Ok(Value::atom(format!(":{}", name), ValueType::Unknown))
}

pub fn literal(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::atom("NULL", ValueType::Unknown),
        Literal::Boolean(true) => Value::atom("TRUE", ValueType::Boolean),
        Literal::Boolean(false) => Value::atom("FALSE", ValueType::Boolean),
        Literal::Integer(value) => Value::atom(value.to_string(), ValueType::Integer),
        Literal::Float(value) => Value::atom(value.to_string(), ValueType::Float),
        Literal::String(value) => Value::atom(quote_string(value), ValueType::String),
    }
}

/// Single-quotes a string for MySQL.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

fn arithmetic_result(operands: &[Value]) -> ValueType {
    if operands.iter().all(|v| v.value_type == ValueType::Integer) {
        ValueType::Integer
    } else if operands
        .iter()
        .all(|v| matches!(v.value_type, ValueType::Integer | ValueType::Float))
    {
        ValueType::Float
    } else {
        ValueType::Unknown
    }
}

fn type_name(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Boolean => "boolean",
        ValueType::Integer => "integer",
        ValueType::Float => "float",
        ValueType::String => "string",
        ValueType::Unknown => "unknown",
    }
}

impl Compilation<'_, '_> {
    /// Compiles a scalar sub-expression relative to the current element.
    pub(super) fn compile_value(
        &mut self,
        expression: &Expression,
        cursor: &Cursor,
    ) -> Result<Value, TranslatorError> {
        match expression {
            Expression::Parameter(name) => parameter(name),
            Expression::Literal(value) => Ok(literal(value)),
            Expression::Property(path) => match self.resolve_path(path, Some(cursor))? {
                PathTarget::Value {
                    cursor,
                    column,
                    value_type,
                } => {
                    let sql = self.select.qualify(cursor.table, &column)?;
                    Ok(Value::atom(sql, value_type))
                }
                PathTarget::Collection(_) => Err(TranslatorError::UnsupportedExpression(format!(
                    "`{}` is a collection, not a value",
                    path
                ))),
            },
            Expression::Function(call) => self.compile_function(call, cursor),
        }
    }

    fn compile_function(
        &mut self,
        call: &FunctionCall,
        cursor: &Cursor,
    ) -> Result<Value, TranslatorError> {
        let mapping = function_registry::get_function_mapping(&call.name).ok_or_else(|| {
            TranslatorError::UnsupportedExpression(format!(
                "`{}` is not a scalar function",
                call.name
            ))
        })?;
        if call.arguments.len() != mapping.arity() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "`{}` takes {} argument(s), got {}",
                call.name,
                mapping.arity(),
                call.arguments.len()
            )));
        }

        if let Some(test) = self.compile_null_test(call, cursor)? {
            return Ok(test);
        }

        let mut operands = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            operands.push(self.compile_value(argument, cursor)?);
        }
        check_operands(&mapping, &operands, call)?;

        log::trace!("Compiling {} via {:?}", call.name, mapping.form);
        Ok(render_function(&mapping, &operands))
    }

    /// `equal(x, null)` is `x IS NULL`; `= NULL` would never hold.
    fn compile_null_test(
        &mut self,
        call: &FunctionCall,
        cursor: &Cursor,
    ) -> Result<Option<Value>, TranslatorError> {
        let is_null = |e: &Expression| matches!(e, Expression::Literal(Literal::Null));
        let Some(null_at) = call.arguments.iter().position(is_null) else {
            return Ok(None);
        };

        let test = match call.name.as_str() {
            "equal" => "IS NULL",
            "notEqual" => "IS NOT NULL",
            "less" | "lessEqual" | "greaterEqual" | "greater" | "match" => {
                return Err(TranslatorError::UnsupportedExpression(format!(
                    "`{}` compares with null; use equal or notEqual",
                    call
                )))
            }
            _ => return Ok(None),
        };

        let operand = self.compile_value(&call.arguments[1 - null_at], cursor)?;
        Ok(Some(Value::compound(
            format!("{} {}", operand.as_operand(), test),
            ValueType::Boolean,
        )))
    }

    /// Compiles a slice bound. MySQL takes only placeholders and
    /// non-negative integer constants in LIMIT.
    pub(super) fn compile_numeric_constant(
        &self,
        expression: &Expression,
    ) -> Result<Value, TranslatorError> {
        match expression {
            Expression::Parameter(name) => parameter(name),
            Expression::Literal(Literal::Integer(value)) if *value >= 0 => {
                Ok(Value::atom(value.to_string(), ValueType::Integer))
            }
            other => Err(TranslatorError::UnsupportedExpression(format!(
                "slice bound `{}` must be a parameter or a non-negative integer",
                other
            ))),
        }
    }
}

fn check_operands(
    mapping: &FunctionMapping,
    operands: &[Value],
    call: &FunctionCall,
) -> Result<(), TranslatorError> {
    for (index, (kind, operand)) in mapping.operands.iter().zip(operands).enumerate() {
        if !kind.accepts(operand.value_type) {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "argument {} of `{}` is {}, expected {:?}",
                index + 1,
                call,
                type_name(operand.value_type),
                kind
            )));
        }
    }
    // plus is numeric addition or string concatenation
    if mapping.request_name == "plus"
        && operands.iter().any(|v| v.value_type == ValueType::Boolean)
    {
        return Err(TranslatorError::UnsupportedExpression(format!(
            "`{}` cannot add boolean values",
            call
        )));
    }
    Ok(())
}

fn render_function(mapping: &FunctionMapping, operands: &[Value]) -> Value {
    let result = match mapping.result {
        ResultType::Fixed(value_type) => value_type,
        ResultType::Arithmetic => arithmetic_result(operands),
    };

    if mapping.request_name == "plus"
        && operands.iter().any(|v| v.value_type == ValueType::String)
    {
        let args: Vec<String> = operands.iter().map(|v| v.sql.clone()).collect();
        return Value::atom(format!("CONCAT({})", args.join(", ")), ValueType::String);
    }

    match mapping.form {
        SqlForm::Infix(op) => Value::compound(
            format!(
                "{} {} {}",
                operands[0].as_operand(),
                op,
                operands[1].as_operand()
            ),
            result,
        ),
        SqlForm::Prefix(op) => {
            Value::compound(format!("{} {}", op, operands[0].as_operand()), result)
        }
        SqlForm::Call(name) => {
            let args: Vec<String> = operands.iter().map(|v| v.sql.clone()).collect();
            let args = match mapping.arg_transform {
                Some(transform) => transform(&args),
                None => args,
            };
            Value::atom(format!("{}({})", name, args.join(", ")), result)
        }
    }
}
