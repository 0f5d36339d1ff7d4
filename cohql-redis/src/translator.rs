use crate::clause::Clause;
use crate::error::{QueryError, TranslationError};
use crate::escape::{escape, format_literal, format_numeric, like_pattern};
use crate::parser::parse_with_max_depth;
use crate::postprocess::strip_redundant_parentheses;
use crate::registry::FieldTypeRegistry;
use crate::types::{CompareOp, Expression, FieldType, Literal};
use serde::Deserialize;
use std::sync::Arc;

/// Matches nothing; the index never stores nulls.
pub const NEVER_MATCH_NULL: &str = "__NEVER_MATCH_NULL__";
/// Matches nothing; stands in for an IN list without usable values.
pub const NEVER_MATCH: &str = "__NEVER_MATCH__";
/// Matches every indexed document.
pub const MATCH_ALL: &str = "*";

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What `field IN ()` (no elements at all) translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInListPolicy {
    /// Fail with [`TranslationError::EmptyValueList`].
    #[default]
    Reject,
    /// Emit the `__NEVER_MATCH__` sentinel, same as an IN list of nulls.
    NeverMatch,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    pub strip_redundant_parens: bool,
    pub coalesce_tag_ors: bool,
    pub empty_in_list: EmptyInListPolicy,
    pub max_depth: usize,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            strip_redundant_parens: true,
            coalesce_tag_ors: false,
            empty_in_list: EmptyInListPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Compiles condition trees into search query strings.
///
/// Holds nothing mutable; one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Translator {
    registry: Arc<FieldTypeRegistry>,
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(registry: FieldTypeRegistry) -> Self {
        Self::with_shared_registry(Arc::new(registry))
    }

    pub fn with_shared_registry(registry: Arc<FieldTypeRegistry>) -> Self {
        Self {
            registry,
            options: TranslatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Translate a condition tree into a query string.
    pub fn translate(&self, expr: &Expression) -> Result<String, TranslationError> {
        self.compiler().translate(expr)
    }

    /// Parse condition text, then translate it. Nesting beyond
    /// `options.max_depth` already fails while parsing.
    pub fn translate_str(&self, condition: &str) -> Result<String, QueryError> {
        let expr = parse_with_max_depth(condition, self.options.max_depth)?;
        Ok(self.translate(&expr)?)
    }

    /// The structured clause tree for `expr`, before any post-processing.
    pub fn to_clause(&self, expr: &Expression) -> Result<Clause, TranslationError> {
        self.compiler().build(expr, 1)
    }

    fn compiler(&self) -> Compiler<'_> {
        Compiler {
            registry: &self.registry,
            options: &self.options,
        }
    }
}

struct Compiler<'a> {
    registry: &'a FieldTypeRegistry,
    options: &'a TranslatorOptions,
}

impl Compiler<'_> {
    fn translate(&self, expr: &Expression) -> Result<String, TranslationError> {
        let mut clause = self.build(expr, 1)?;
        if self.options.coalesce_tag_ors {
            clause = clause.coalesce_tags();
        }
        let query = clause.render();
        if self.options.strip_redundant_parens {
            Ok(strip_redundant_parentheses(&query).to_string())
        } else {
            Ok(query)
        }
    }

    fn build(&self, expr: &Expression, depth: usize) -> Result<Clause, TranslationError> {
        if depth > self.options.max_depth {
            return Err(TranslationError::ExpressionTooDeep(self.options.max_depth));
        }
        let next = depth + 1;

        match expr {
            Expression::And(left, right) => Ok(Clause::And(
                Box::new(self.build(left, next)?),
                Box::new(self.build(right, next)?),
            )),
            Expression::Or(left, right) => Ok(Clause::Or(vec![
                self.build(left, next)?,
                self.build(right, next)?,
            ])),
            Expression::Group(inner) => Ok(Clause::Group(Box::new(self.build(inner, next)?))),
            Expression::Not(inner) => Ok(Clause::Not(Box::new(self.build(inner, next)?))),
            Expression::Compare { field, op, value } => self.compare(field, *op, value),
            Expression::Between { field, low, high } => between(field, low, high),
            Expression::In {
                field,
                values,
                negated,
            } => self.in_list(field, values, *negated),
            Expression::Like { field, pattern } => self.like(field, pattern),
            Expression::IsNull { field, negated } => Ok(is_null(field, *negated)),
        }
    }

    fn compare(
        &self,
        field: &str,
        op: CompareOp,
        value: &Literal,
    ) -> Result<Clause, TranslationError> {
        let field_type = self.registry.resolve(field)?;

        if op.is_range() {
            if field_type != FieldType::Numeric {
                return Err(TranslationError::UnsupportedConstruct(format!(
                    "{} on {} field {}",
                    op, field_type, field
                )));
            }
            let v = format_numeric(value)?;
            let range = match op {
                CompareOp::Gt => format!("@{}:[({} +inf]", field, v),
                CompareOp::Gte => format!("@{}:[{} +inf]", field, v),
                CompareOp::Lt => format!("@{}:[-inf ({}]", field, v),
                _ => format!("@{}:[-inf {}]", field, v),
            };
            return Ok(Clause::Atom(range));
        }

        let negated = op == CompareOp::NotEq;
        match (field_type, negated) {
            (FieldType::Text, false) => Ok(Clause::Atom(format!(
                "@{}:\"{}\"",
                field,
                escape(&format_literal(value)?)
            ))),
            (FieldType::Text, true) => Ok(Clause::Atom(format!(
                "-@{}:{}",
                field,
                escape(&format_literal(value)?)
            ))),
            (FieldType::Tag, false) => Ok(Clause::tag(field, escape(&format_literal(value)?))),
            (FieldType::Tag, true) => Ok(Clause::Atom(format!(
                "-@{}:{{{}}}",
                field,
                escape(&format_literal(value)?)
            ))),
            (FieldType::Numeric, false) => {
                let v = format_numeric(value)?;
                Ok(Clause::Atom(format!("@{}:[{} {}]", field, v, v)))
            }
            (FieldType::Numeric, true) => Ok(Clause::Atom(format!(
                "-@{}:{}",
                field,
                format_numeric(value)?
            ))),
        }
    }

    fn in_list(
        &self,
        field: &str,
        values: &[Literal],
        negated: bool,
    ) -> Result<Clause, TranslationError> {
        let field_type = self.registry.resolve(field)?;

        if values.is_empty() {
            return match self.options.empty_in_list {
                EmptyInListPolicy::Reject => {
                    Err(TranslationError::EmptyValueList(field.to_string()))
                }
                EmptyInListPolicy::NeverMatch => Ok(never_match(field)),
            };
        }

        let usable: Vec<&Literal> = values.iter().filter(|v| !v.is_null()).collect();
        if usable.is_empty() {
            return Ok(never_match(field));
        }

        let members = usable
            .into_iter()
            .map(|value| match field_type {
                FieldType::Text => Ok(Clause::Atom(format!(
                    "@{}:\"{}\"",
                    field,
                    escape(&format_literal(value)?)
                ))),
                FieldType::Tag => Ok(Clause::tag(field, escape(&format_literal(value)?))),
                FieldType::Numeric => {
                    let v = format_numeric(value)?;
                    Ok(Clause::Atom(format!("@{}:[{} {}]", field, v, v)))
                }
            })
            .collect::<Result<Vec<_>, TranslationError>>()?;

        let group = Clause::Or(members);
        if negated {
            Ok(Clause::Not(Box::new(group)))
        } else {
            Ok(group)
        }
    }

    fn like(&self, field: &str, pattern: &Literal) -> Result<Clause, TranslationError> {
        let field_type = self.registry.resolve(field)?;
        let pattern = like_pattern(&format_literal(pattern)?);
        match field_type {
            FieldType::Text => Ok(Clause::Atom(format!("@{}:\"{}\"", field, pattern))),
            FieldType::Tag => Ok(Clause::Atom(format!("@{}:{{{}}}", field, pattern))),
            FieldType::Numeric => Err(TranslationError::UnsupportedConstruct(format!(
                "LIKE on NUMERIC field {}",
                field
            ))),
        }
    }
}

// BETWEEN is type-agnostic and never consults the registry.
fn between(field: &str, low: &Literal, high: &Literal) -> Result<Clause, TranslationError> {
    Ok(Clause::Atom(format!(
        "@{}:[{} {}]",
        field,
        format_literal(low)?,
        format_literal(high)?
    )))
}

fn is_null(field: &str, negated: bool) -> Clause {
    if negated {
        Clause::atom(MATCH_ALL)
    } else {
        Clause::Atom(format!("@{}:{}", field, NEVER_MATCH_NULL))
    }
}

fn never_match(field: &str) -> Clause {
    Clause::Atom(format!("@{}:{}", field, NEVER_MATCH))
}

/// Translate with default options.
pub fn translate(
    expr: &Expression,
    registry: &FieldTypeRegistry,
) -> Result<String, TranslationError> {
    let options = TranslatorOptions::default();
    Compiler {
        registry,
        options: &options,
    }
    .translate(expr)
}
