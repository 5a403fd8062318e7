//! JSON path extraction.

use serde_json::Value;

/// Extract a value from nested JSON using a dot path.
///
/// Accepts `$.a.b`, `a.b.0` and `a.b[0]`; `*` segments are skipped so
/// `list[*]` addresses the array itself.
pub fn extract_path<'a>(data: &'a Value, path: &str) -> &'a Value {
    let normalized = path
        .trim()
        .trim_start_matches('$')
        .replace('[', ".")
        .replace(']', "");

    let mut current = data;
    for key in normalized.split('.').filter(|k| !k.is_empty() && *k != "*") {
        current = match current {
            Value::Object(map) => map.get(key).unwrap_or(&Value::Null),
            Value::Array(arr) => match key.parse::<usize>() {
                Ok(idx) => arr.get(idx).unwrap_or(&Value::Null),
                Err(_) => &Value::Null,
            },
            _ => &Value::Null,
        };
    }

    current
}
