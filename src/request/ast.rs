use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the request tree.
///
/// JSON form: `{"function": {"name": "count", "arguments": [...]}}`,
/// `{"property": ["People", "Pets"]}`, `{"parameter": "minAge"}`,
/// `{"literal": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Function(FunctionCall),
    Property(PropertyPath),
    Parameter(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

/// Schema-relative names, e.g. `People.Pets.age`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath {
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Expression {
    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::Function(FunctionCall {
            name: name.into(),
            arguments,
        })
    }

    /// Builds a property path from a dotted string.
    pub fn property(path: &str) -> Self {
        Expression::Property(PropertyPath {
            segments: path.split('.').map(str::to_string).collect(),
        })
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Expression::Parameter(name.into())
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    /// Number of nodes on the longest root-to-leaf chain.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Function(call) => {
                1 + call
                    .arguments
                    .iter()
                    .map(Expression::depth)
                    .max()
                    .unwrap_or(0)
            }
            _ => 1,
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Function(call) => write!(f, "{}", call),
            Expression::Property(path) => write!(f, "{}", path),
            Expression::Parameter(name) => write!(f, ":{}", name),
            Expression::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "{:?}", value),
        }
    }
}
