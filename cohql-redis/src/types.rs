//! Expression tree types consumed by the translator.

use serde::Deserialize;
use std::str::FromStr;

/// How a field is indexed on the search side; drives the output syntax family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FieldType {
    Text,
    Tag,
    Numeric,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "TEXT"),
            FieldType::Tag => write!(f, "TAG"),
            FieldType::Numeric => write!(f, "NUMERIC"),
        }
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TEXT" => Ok(FieldType::Text),
            "TAG" => Ok(FieldType::Tag),
            "NUMERIC" => Ok(FieldType::Numeric),
            _ => anyhow::bail!("Invalid field type: {} (expected TEXT, TAG or NUMERIC)", s),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FieldType::from_str(&s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,    // =
    NotEq, // != or <>
    Gt,    // >
    Gte,   // >=
    Lt,    // <
    Lte,   // <=
}

impl CompareOp {
    /// Ordered comparisons map onto numeric ranges.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte
        )
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl FromStr for CompareOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Gte),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Lte),
            _ => anyhow::bail!("Invalid comparison operator: {}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Decimal(f64),
    /// The NULL keyword. Only meaningful inside IN lists, where it is dropped.
    Null,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    /// True for the NULL keyword and for string literals spelling it.
    pub fn is_null(&self) -> bool {
        match self {
            Literal::Null => true,
            Literal::String(s) => s.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Decimal(value)
    }
}

/// A parsed condition. Produced by [`crate::parse`] or built directly by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    /// Explicit parentheses in the source condition.
    Group(Box<Expression>),
    Compare {
        field: String,
        op: CompareOp,
        value: Literal,
    },
    Between {
        field: String,
        low: Literal,
        high: Literal,
    },
    In {
        field: String,
        values: Vec<Literal>,
        negated: bool,
    },
    Like {
        field: String,
        pattern: Literal,
    },
    IsNull {
        field: String,
        negated: bool,
    },
}

impl Expression {
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    pub fn group(inner: Expression) -> Self {
        Expression::Group(Box::new(inner))
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Literal>) -> Self {
        Expression::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn between(
        field: impl Into<String>,
        low: impl Into<Literal>,
        high: impl Into<Literal>,
    ) -> Self {
        Expression::Between {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn in_list(field: impl Into<String>, values: Vec<Literal>, negated: bool) -> Self {
        Expression::In {
            field: field.into(),
            values,
            negated,
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<Literal>) -> Self {
        Expression::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn is_null(field: impl Into<String>, negated: bool) -> Self {
        Expression::IsNull {
            field: field.into(),
            negated,
        }
    }
}
