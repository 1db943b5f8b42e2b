//! Custom filters available to schema templates

use minijinja::Value;

fn text_of(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// Quote a value with double quotes, escaping backslashes and quotes
///
/// Usage: {{ target.schema | quote }}
#[must_use]
pub fn quote(value: Value) -> String {
    let s = text_of(&value);
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a value with single quotes (SQL and YAML style doubling)
///
/// Usage: {{ owner | squote }}
#[must_use]
pub fn squote(value: Value) -> String {
    format!("'{}'", text_of(&value).replace('\'', "''"))
}

/// Convert to snake_case
///
/// Word boundaries are lower-to-upper transitions and any of `-`, ` `, `.`.
#[must_use]
pub fn snakecase(value: String) -> String {
    let mut result = String::with_capacity(value.len() + value.len() / 4);
    let mut prev_lower_or_digit = false;

    for c in value.chars() {
        if c.is_uppercase() {
            if prev_lower_or_digit {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else if matches!(c, '-' | ' ' | '.') {
            if !result.ends_with('_') {
                result.push('_');
            }
            prev_lower_or_digit = false;
        } else {
            result.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// Convert to kebab-case
#[must_use]
pub fn kebabcase(value: String) -> String {
    snakecase(value).replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote(Value::from("orders")), "\"orders\"");
        assert_eq!(quote(Value::from("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(quote(Value::from(42)), "\"42\"");
    }

    #[test]
    fn test_squote() {
        assert_eq!(squote(Value::from("orders")), "'orders'");
        assert_eq!(squote(Value::from("o'brien")), "'o''brien'");
    }

    #[test]
    fn test_snakecase() {
        assert_eq!(snakecase("camelCase".to_string()), "camel_case");
        assert_eq!(snakecase("PascalCase".to_string()), "pascal_case");
        assert_eq!(snakecase("order-items v2".to_string()), "order_items_v2");
        assert_eq!(snakecase("stg.orders".to_string()), "stg_orders");
        assert_eq!(snakecase("already_snake".to_string()), "already_snake");
    }

    #[test]
    fn test_kebabcase() {
        assert_eq!(kebabcase("orderItems".to_string()), "order-items");
    }
}
