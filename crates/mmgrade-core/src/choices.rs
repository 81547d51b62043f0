use serde_json::Value;

/// Parse an answer-choice list out of a table cell.
///
/// Accepts a JSON array of strings, or a string holding either a JSON
/// array or a Python-repr list (`['cat', 'bird']`) as produced when a
/// pandas dataframe round-trips through CSV. Anything else yields an
/// empty list, which disables the choice-text fallback for that row.
pub fn parse_choices(cell: &Value) -> Vec<String> {
    match cell {
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => parse_choices_str(s),
        _ => Vec::new(),
    }
}

/// String form of [`parse_choices`].
pub fn parse_choices_str(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('[') {
        return Vec::new();
    }
    if let Ok(choices) = serde_json::from_str::<Vec<String>>(trimmed) {
        return choices;
    }
    serde_json::from_str(&repr_to_json(trimmed)).unwrap_or_default()
}

/// Rewrite Python single-quoted string literals as JSON double-quoted ones.
///
/// Handles `\'` escapes inside single-quoted literals and escapes any `"`
/// they contain. Text outside quotes passes through unchanged.
fn repr_to_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\'' {
            out.push(c);
            continue;
        }
        out.push('"');
        while let Some(sc) = chars.next() {
            match sc {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                '\'' => {
                    out.push('"');
                    break;
                }
                '"' => out.push_str("\\\""),
                _ => out.push(sc),
            }
        }
    }
    out
}
