//! Translate SQL-style filter conditions into RediSearch query strings.
//!
//! ```text
//! name = 'John' AND age > 25            ->  @name:"John" @age:[(25 +inf]
//! role NOT IN ('admin', 'moderator')    ->  -((@role:{admin}) | (@role:{moderator}))
//! age IS NULL                           ->  @age:__NEVER_MATCH_NULL__
//! ```
//!
//! Output syntax depends on the field type from a [`FieldTypeRegistry`]:
//!
//! | Field type | `field = v` | `field != v` |
//! |------------|-------------|--------------|
//! | TEXT | `@field:"v"` | `-@field:v` |
//! | TAG | `@field:{v}` | `-@field:{v}` |
//! | NUMERIC | `@field:[v v]` | `-@field:v` |
//!
//! Ordered comparisons need a NUMERIC field and become ranges (`[(v +inf]`,
//! `[v +inf]`, `[-inf (v]`, `[-inf v]`). OR operands are always parenthesized,
//! AND is plain juxtaposition.

pub mod clause;
pub mod config;
pub mod error;
pub mod escape;
pub mod parser;
pub mod postprocess;
pub mod registry;
pub mod translator;
pub mod types;

pub use clause::Clause;
pub use config::Config;
pub use error::{ParseError, QueryError, TranslationError};
pub use escape::escape;
pub use parser::{parse, parse_with_max_depth};
pub use postprocess::{is_balanced, strip_redundant_parentheses};
pub use registry::FieldTypeRegistry;
pub use translator::{
    translate, EmptyInListPolicy, Translator, TranslatorOptions, MATCH_ALL, NEVER_MATCH,
    NEVER_MATCH_NULL,
};
pub use types::{CompareOp, Expression, FieldType, Literal};
