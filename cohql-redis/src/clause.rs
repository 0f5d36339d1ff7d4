//! Structured form of a translated query, one step before the final string.
//!
//! Keeping the tag clauses structured lets same-field tag ORs be merged
//! without pattern matching over rendered text.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Fully rendered leaf fragment, e.g. `@age:[10 +inf]`.
    Atom(String),
    /// Positive tag match; values are already escaped.
    Tag { field: String, values: Vec<String> },
    /// Juxtaposition.
    And(Box<Clause>, Box<Clause>),
    /// Union; every operand is parenthesized on output.
    Or(Vec<Clause>),
    Group(Box<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn atom(text: impl Into<String>) -> Self {
        Clause::Atom(text.into())
    }

    pub fn tag(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Tag {
            field: field.into(),
            values: vec![value.into()],
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The single tag clause this node amounts to, looking through groups
    /// and one-operand unions.
    fn as_tag(&self) -> Option<(&str, &[String])> {
        match self {
            Clause::Tag { field, values } => Some((field, values)),
            Clause::Group(inner) => inner.as_tag(),
            Clause::Or(children) if children.len() == 1 => children[0].as_tag(),
            _ => None,
        }
    }

    /// Merge runs of adjacent same-field tag operands of a union into one
    /// multi-valued tag clause. Clauses for different fields are never merged.
    pub fn coalesce_tags(self) -> Clause {
        match self {
            Clause::Or(children) => {
                let mut merged = coalesce_union(children);
                // One multi-valued tag clause is atomic and needs no union around it
                if merged.len() == 1 && matches!(merged[0], Clause::Tag { .. }) {
                    merged.remove(0)
                } else {
                    Clause::Or(merged)
                }
            }
            Clause::And(left, right) => Clause::And(
                Box::new(left.coalesce_tags()),
                Box::new(right.coalesce_tags()),
            ),
            Clause::Group(inner) => Clause::Group(Box::new(inner.coalesce_tags())),
            Clause::Not(inner) => Clause::Not(Box::new(inner.coalesce_tags())),
            leaf @ (Clause::Atom(_) | Clause::Tag { .. }) => leaf,
        }
    }
}

fn coalesce_union(children: Vec<Clause>) -> Vec<Clause> {
    let mut merged = Vec::with_capacity(children.len());
    let mut iter = children
        .into_iter()
        .map(Clause::coalesce_tags)
        .peekable();

    while let Some(child) = iter.next() {
        let (field, mut values) = match child.as_tag() {
            Some((field, values)) => (field.to_string(), values.to_vec()),
            None => {
                merged.push(child);
                continue;
            }
        };

        let mut absorbed = false;
        loop {
            let more = match iter.peek().and_then(Clause::as_tag) {
                Some((next_field, more)) if next_field == field => more.to_vec(),
                _ => break,
            };
            values.extend(more);
            iter.next();
            absorbed = true;
        }

        if absorbed {
            merged.push(Clause::Tag { field, values });
        } else {
            merged.push(child);
        }
    }
    merged
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Atom(text) => write!(f, "{}", text),
            Clause::Tag { field, values } => write!(f, "@{}:{{{}}}", field, values.join(",")),
            Clause::And(left, right) => write!(f, "{} {}", left, right),
            Clause::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    // A group already carries its own parentheses
                    match child {
                        Clause::Group(_) => write!(f, "{}", child)?,
                        _ => write!(f, "({})", child)?,
                    }
                }
                Ok(())
            }
            Clause::Group(inner) => write!(f, "({})", inner),
            // A group's own parentheses already delimit the negated operand;
            // `-((a b))` would mean the same as `-(a b)`
            Clause::Not(inner) if matches!(**inner, Clause::Group(_)) => write!(f, "-{}", inner),
            Clause::Not(inner) => {
                let inner = inner.to_string();
                if inner.contains(' ') || inner.contains('|') {
                    write!(f, "-({})", inner)
                } else {
                    write!(f, "-{}", inner)
                }
            }
        }
    }
}
