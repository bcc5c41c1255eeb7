use serde_json::Value;

/// Length of a normalized barcode, in characters
pub const BARCODE_LEN: usize = 13;

/// Zero-width space, non-joiner, joiner and the byte-order mark.
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// Render a JSON value the way a scanner payload is read: strings as-is,
/// other scalars by their JSON text, a missing field as `undefined`.
/// Arrays join their elements with `,` (null elements render empty).
pub fn coerce(raw: Option<&Value>) -> String {
    match raw {
        None => "undefined".to_string(),
        Some(value) => coerce_value(value),
    }
}

fn coerce_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

/// Strip every whitespace and zero-width character from `input`.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && !is_invisible(*c))
        .collect()
}

/// Sanitize and length-check; `None` when the result is not a barcode.
pub fn normalize(raw: Option<&Value>) -> Option<String> {
    let code = sanitize(&coerce(raw));
    (code.chars().count() == BARCODE_LEN).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_whitespace_and_zero_width_characters() {
        let raw = json!(" 123 456789012\u{200B}");
        assert_eq!(normalize(Some(&raw)).as_deref(), Some("1234567890123"));

        let raw = json!("\u{FEFF}1234\t5678\n90123\u{200D}");
        assert_eq!(normalize(Some(&raw)).as_deref(), Some("1234567890123"));
    }

    #[test]
    fn rejects_wrong_lengths() {
        for raw in [json!("000000000000"), json!("12345678901234"), json!(""), json!("   ")] {
            assert_eq!(normalize(Some(&raw)), None, "accepted {raw}");
        }
    }

    #[test]
    fn numbers_are_coerced_to_their_digits() {
        let raw = json!(1234567890123u64);
        assert_eq!(normalize(Some(&raw)).as_deref(), Some("1234567890123"));
    }

    #[test]
    fn arrays_join_their_elements() {
        let raw = json!(["1234567890123"]);
        assert_eq!(normalize(Some(&raw)).as_deref(), Some("1234567890123"));

        assert_eq!(coerce(Some(&json!(["12", null, 3, ["4"]]))), "12,,3,4");
        assert_eq!(normalize(Some(&json!(["1234567", "890123"]))), None);
    }

    #[test]
    fn objects_are_rejected() {
        assert_eq!(coerce(Some(&json!({ "code": "1234567890123" }))), "[object Object]");
        assert_eq!(normalize(Some(&json!({ "code": "1234567890123" }))), None);
    }

    #[test]
    fn missing_and_null_are_rejected() {
        assert_eq!(coerce(None), "undefined");
        assert_eq!(coerce(Some(&Value::Null)), "null");
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(&Value::Null)), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let raw = json!("ÄÄÄÄÄÄÄÄÄÄÄÄÄ");
        assert!(normalize(Some(&raw)).is_some());
    }
}
