use crate::error::TranslationError;
use crate::types::Literal;

/// Characters the query parser would otherwise treat as syntax.
const SPECIAL_CHARS: [char; 7] = ['\\', '@', '.', ',', ' ', '_', '+'];

/// Backslash-escape every syntactically significant character.
///
/// Equivalent to substituting `\`, `@`, `.`, `,`, space, `_`, `+` one after the
/// other with the backslash first, so no inserted backslash is escaped again.
/// Not idempotent: escape each raw value exactly once.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    if SPECIAL_CHARS.contains(&ch) {
        out.push('\\');
    }
    out.push(ch);
}

/// Textual form of a literal. Strings are kept raw, numbers never use exponent
/// notation and decimals always keep a decimal point.
pub fn format_literal(literal: &Literal) -> Result<String, TranslationError> {
    match literal {
        Literal::String(s) => Ok(s.clone()),
        Literal::Int(i) => Ok(i.to_string()),
        Literal::Decimal(d) => format_decimal(*d),
        Literal::Null => Err(TranslationError::UnsupportedConstruct(
            "NULL literal outside an IN list".to_string(),
        )),
    }
}

fn format_decimal(value: f64) -> Result<String, TranslationError> {
    if !value.is_finite() {
        return Err(TranslationError::InvalidRangeValue(value.to_string()));
    }
    let text = value.to_string();
    if text.contains('.') {
        Ok(text)
    } else {
        Ok(format!("{}.0", text))
    }
}

/// Textual form of a literal that must be a number: integers, decimals, or
/// strings holding one (`'30'`).
pub fn format_numeric(literal: &Literal) -> Result<String, TranslationError> {
    match literal {
        Literal::Int(_) | Literal::Decimal(_) => format_literal(literal),
        Literal::String(s) if is_numeric(s) => Ok(s.trim().to_string()),
        Literal::String(s) => Err(TranslationError::InvalidRangeValue(s.clone())),
        Literal::Null => Err(TranslationError::InvalidRangeValue("NULL".to_string())),
    }
}

fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    let plain = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    plain && text.chars().any(|c| c.is_ascii_digit()) && text.parse::<f64>().is_ok()
}

/// Translate a LIKE pattern: `%` becomes `*`, `_` becomes `?`, and everything
/// else is escaped like any other value.
pub fn like_pattern(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        match ch {
            '%' => out.push('*'),
            '_' => out.push('?'),
            _ => push_escaped(&mut out, ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_each_special_char() {
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("john@test.com"), r"john\@test\.com");
        assert_eq!(escape("admin,moderator"), r"admin\,moderator");
        assert_eq!(escape("New York"), r"New\ York");
        assert_eq!(escape("out_of_stock"), r"out\_of\_stock");
        assert_eq!(escape("user+filter"), r"user\+filter");
    }

    #[test]
    fn test_escape_plain_value_unchanged() {
        assert_eq!(escape("value1"), "value1");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_matches_sequential_replace() {
        let input = r"a\@b.c,d e_f+g\\";
        let sequential = input
            .replace('\\', "\\\\")
            .replace('@', "\\@")
            .replace('.', "\\.")
            .replace(',', "\\,")
            .replace(' ', "\\ ")
            .replace('_', "\\_")
            .replace('+', "\\+");
        assert_eq!(escape(input), sequential);
    }

    #[test]
    fn test_double_escape_differs() {
        for raw in ["a.b", "x y", r"back\slash", "a+b", "@", "_"] {
            assert_ne!(escape(&escape(raw)), escape(raw), "input {}", raw);
        }
    }

    #[test]
    fn test_format_literal() {
        assert_eq!(format_literal(&Literal::string("O'Connor")).unwrap(), "O'Connor");
        assert_eq!(format_literal(&Literal::Int(-5)).unwrap(), "-5");
        assert_eq!(format_literal(&Literal::Decimal(25.5)).unwrap(), "25.5");
        assert_eq!(format_literal(&Literal::Decimal(25.0)).unwrap(), "25.0");
        assert_eq!(
            format_literal(&Literal::Decimal(1e21)).unwrap(),
            "1000000000000000000000.0"
        );
        assert!(format_literal(&Literal::Null).is_err());
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(&Literal::Int(10)).unwrap(), "10");
        assert_eq!(format_numeric(&Literal::string("30")).unwrap(), "30");
        assert_eq!(format_numeric(&Literal::string("-2.5")).unwrap(), "-2.5");
        assert_eq!(
            format_numeric(&Literal::string("twenty")),
            Err(TranslationError::InvalidRangeValue("twenty".to_string()))
        );
        assert!(format_numeric(&Literal::string("inf")).is_err());
        assert!(format_numeric(&Literal::string("-")).is_err());
        assert!(format_numeric(&Literal::Decimal(f64::NAN)).is_err());
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("J_hn"), "J?hn");
        assert_eq!(like_pattern("%son%"), "*son*");
        assert_eq!(like_pattern("%test.com"), r"*test\.com");
        assert_eq!(like_pattern("a b%"), r"a\ b*");
    }
}
