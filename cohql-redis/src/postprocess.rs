//! Passes over the assembled query string.

/// Strip outer parenthesis pairs that wrap the whole query, to a fixed point.
///
/// `(a) | (b)` is left alone: removing its ends would unbalance it.
pub fn strip_redundant_parentheses(query: &str) -> &str {
    let mut current = query;
    while current.len() >= 2 && current.starts_with('(') && current.ends_with(')') {
        let stripped = &current[1..current.len() - 1];
        if !is_balanced(stripped) {
            break;
        }
        current = stripped;
    }
    current
}

/// Grouping-parenthesis balance counter: `(` increments, `)` decrements,
/// going negative fails.
///
/// Range bodies (`@field:[...]`) are skipped, since exclusive bounds such as
/// `[(10 +inf]` carry an unmatched `(`. Every other parenthesis counts,
/// including ones inside quoted or tag values.
pub fn is_balanced(query: &str) -> bool {
    let mut balance: i64 = 0;
    let mut in_range = false;
    let mut prev = None;

    for ch in query.chars() {
        match ch {
            '[' if !in_range && prev == Some(':') => in_range = true,
            ']' if in_range => in_range = false,
            _ if in_range => {}
            '(' => balance += 1,
            ')' => {
                balance -= 1;
                if balance < 0 {
                    return false;
                }
            }
            _ => {}
        }
        prev = Some(ch);
    }
    balance == 0
}
