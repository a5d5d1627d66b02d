//! Typing of a single raw token.

use piper_common::types::ParameterValue;

/// Converts one raw token into a typed value.
///
/// Order of attempts, first match wins:
/// 1. Any `"` present: quotes are stripped and the text is a string, so
///    quoting forces literal typing of numbers and booleans.
/// 2. A comma after the first character: a comma-separated array of strings.
/// 3. `true` / `false`, case-insensitive: a boolean.
/// 4. A base-10 32-bit integer.
/// 5. Otherwise the raw text as a string.
pub fn parse_value(raw: &str) -> ParameterValue {
    if raw.contains('"') {
        return ParameterValue::String(raw.replace('"', ""));
    }
    if is_comma_array(raw) {
        return ParameterValue::Array(split_array(raw));
    }
    if raw.eq_ignore_ascii_case("true") {
        return ParameterValue::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return ParameterValue::Boolean(false);
    }
    raw.parse::<i32>().map_or_else(
        |_| ParameterValue::String(raw.to_string()),
        ParameterValue::Integer,
    )
}

/// A leading comma does not mark an array.
fn is_comma_array(raw: &str) -> bool {
    raw.find(',').is_some_and(|idx| idx > 0)
}

/// Trailing empty elements are dropped, inner ones kept.
fn split_array(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = raw.split(',').map(str::to_string).collect();
    while items.last().is_some_and(String::is_empty) {
        let _ = items.pop();
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> ParameterValue {
        ParameterValue::String(s.to_string())
    }

    #[test]
    fn booleans_are_case_insensitive() {
        assert_eq!(parse_value("true"), ParameterValue::Boolean(true));
        assert_eq!(parse_value("FALSE"), ParameterValue::Boolean(false));
        assert_eq!(parse_value("True"), ParameterValue::Boolean(true));
    }

    #[test]
    fn integers() {
        assert_eq!(parse_value("42"), ParameterValue::Integer(42));
        assert_eq!(parse_value("-7"), ParameterValue::Integer(-7));
    }

    #[test]
    fn out_of_range_integer_stays_string() {
        assert_eq!(parse_value("99999999999"), string("99999999999"));
    }

    #[test]
    fn comma_array() {
        assert_eq!(
            parse_value("a,b,c"),
            ParameterValue::Array(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn array_elements_are_not_coerced() {
        assert_eq!(
            parse_value("1,true"),
            ParameterValue::Array(vec!["1".into(), "true".into()])
        );
    }

    #[test]
    fn array_drops_trailing_empty_elements() {
        assert_eq!(
            parse_value("a,,b,,"),
            ParameterValue::Array(vec!["a".into(), String::new(), "b".into()])
        );
    }

    #[test]
    fn leading_comma_is_not_an_array() {
        assert_eq!(parse_value(",a,b"), string(",a,b"));
    }

    #[test]
    fn plain_text_is_string() {
        assert_eq!(parse_value("abc"), string("abc"));
        assert_eq!(parse_value(""), string(""));
    }

    #[test]
    fn quoting_forces_string_regardless_of_shape() {
        for raw in ["t", "true", "42", "a,b,c", "", "with space"] {
            assert_eq!(parse_value(&format!("\"{raw}\"")), string(raw), "raw: {raw}");
        }
    }
}
