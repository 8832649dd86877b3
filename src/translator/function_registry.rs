/// Request function registry
///
/// Maps the scalar, boolean and numeric request functions to their MySQL
/// operators and functions, with per-argument type expectations.
use std::collections::HashMap;

use crate::schema::ValueType;

/// How the SQL for a function is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlForm {
    /// `lhs OP rhs`
    Infix(&'static str),
    /// `OP operand`
    Prefix(&'static str),
    /// `NAME(arg, ...)`
    Call(&'static str),
}

/// What an argument must evaluate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Boolean,
    Numeric,
    String,
    Any,
}

impl OperandKind {
    pub fn accepts(self, value_type: ValueType) -> bool {
        match self {
            OperandKind::Boolean => value_type.is_boolean(),
            OperandKind::Numeric => value_type.is_numeric(),
            OperandKind::String => matches!(value_type, ValueType::String | ValueType::Unknown),
            OperandKind::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Fixed(ValueType),
    /// Integer if every operand is, Float if any is, Unknown otherwise.
    Arithmetic,
}

/// Function mapping entry
#[derive(Clone)]
pub struct FunctionMapping {
    pub request_name: &'static str,
    pub form: SqlForm,
    pub operands: &'static [OperandKind],
    pub result: ResultType,
    /// Optional rewrite of the rendered arguments
    pub arg_transform: Option<fn(&[String]) -> Vec<String>>,
}

impl FunctionMapping {
    pub fn arity(&self) -> usize {
        self.operands.len()
    }
}

/// Get the mapping for a request function name
pub fn get_function_mapping(name: &str) -> Option<FunctionMapping> {
    FUNCTION_MAPPINGS.get(name).cloned()
}

pub fn is_function_supported(name: &str) -> bool {
    FUNCTION_MAPPINGS.contains_key(name)
}

fn plain(
    request_name: &'static str,
    form: SqlForm,
    operands: &'static [OperandKind],
    result: ResultType,
) -> FunctionMapping {
    FunctionMapping {
        request_name,
        form,
        operands,
        result,
        arg_transform: None,
    }
}

const COMPARABLE: &[OperandKind] = &[OperandKind::Any, OperandKind::Any];
const BOOLEANS: &[OperandKind] = &[OperandKind::Boolean, OperandKind::Boolean];
const NUMBERS: &[OperandKind] = &[OperandKind::Numeric, OperandKind::Numeric];

// Static function mapping table
lazy_static::lazy_static! {
    static ref FUNCTION_MAPPINGS: HashMap<&'static str, FunctionMapping> = {
        let mut m = HashMap::new();

        let mut insert = |request_name: &'static str, form: SqlForm, operands: &'static [OperandKind], result: ResultType| {
            m.insert(request_name, plain(request_name, form, operands, result));
        };

        // ===== COMPARISONS =====
        insert("less", SqlForm::Infix("<"), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert("lessEqual", SqlForm::Infix("<="), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert("equal", SqlForm::Infix("="), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert("notEqual", SqlForm::Infix("<>"), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert("greaterEqual", SqlForm::Infix(">="), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert("greater", SqlForm::Infix(">"), COMPARABLE, ResultType::Fixed(ValueType::Boolean));
        insert(
            "match",
            SqlForm::Infix("REGEXP"),
            &[OperandKind::String, OperandKind::String],
            ResultType::Fixed(ValueType::Boolean),
        );

        // ===== LOGIC =====
        insert("and", SqlForm::Infix("AND"), BOOLEANS, ResultType::Fixed(ValueType::Boolean));
        insert("or", SqlForm::Infix("OR"), BOOLEANS, ResultType::Fixed(ValueType::Boolean));
        insert("not", SqlForm::Prefix("NOT"), &[OperandKind::Boolean], ResultType::Fixed(ValueType::Boolean));

        // ===== ARITHMETIC =====
        // plus on strings is rewritten to CONCAT by the expression compiler
        insert("plus", SqlForm::Infix("+"), COMPARABLE, ResultType::Arithmetic);
        insert("minus", SqlForm::Infix("-"), NUMBERS, ResultType::Arithmetic);
        insert("times", SqlForm::Infix("*"), NUMBERS, ResultType::Arithmetic);
        insert("divides", SqlForm::Infix("/"), NUMBERS, ResultType::Fixed(ValueType::Float));

        // ===== STRING FUNCTIONS =====
        insert("length", SqlForm::Call("CHAR_LENGTH"), &[OperandKind::String], ResultType::Fixed(ValueType::Integer));
        insert("lowercase", SqlForm::Call("LOWER"), &[OperandKind::String], ResultType::Fixed(ValueType::String));
        insert("uppercase", SqlForm::Call("UPPER"), &[OperandKind::String], ResultType::Fixed(ValueType::String));

        // substring(str, start, length) -> SUBSTRING(str, start + 1, length)
        // Note: request offsets are 0-indexed, MySQL is 1-indexed
        m.insert("substring", FunctionMapping {
            request_name: "substring",
            form: SqlForm::Call("SUBSTRING"),
            operands: &[OperandKind::String, OperandKind::Numeric, OperandKind::Numeric],
            result: ResultType::Fixed(ValueType::String),
            arg_transform: Some(|args| {
                vec![args[0].clone(), format!("{} + 1", args[1]), args[2].clone()]
            }),
        });

        m
    };
}
