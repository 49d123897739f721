//! Query string encoding for GET/DELETE arguments.
//!
//! Keys are sorted, arrays repeat their key once per element, and `null`
//! emits the bare key. Everything is percent-encoded with the strict URI
//! component set, so a space becomes `%20` and never `+`.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::ApiError;

/// Encode `args` as a query string without the leading `?`.
///
/// `args` must serialize to a JSON object.
pub fn to_query_string<A: Serialize + ?Sized>(args: &A) -> Result<String, ApiError> {
    let value = serde_json::to_value(args).map_err(|e| ApiError::Serialization(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ApiError::Serialization(
            "query arguments must serialize to a JSON object".to_string(),
        ));
    };

    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| encode_pair(key, item)));
            }
            other => pairs.push(encode_pair(key, other)),
        }
    }
    Ok(pairs.join("&"))
}

fn encode_pair(key: &str, value: &Value) -> String {
    let key = urlencoding::encode(key);
    match value {
        Value::Null => key.into_owned(),
        Value::String(s) => format!("{key}={}", urlencoding::encode(s)),
        Value::Number(n) => format!("{key}={}", urlencoding::encode(&number_text(n))),
        other => format!("{key}={}", urlencoding::encode(&other.to_string())),
    }
}

/// Whole-valued floats drop their fractional part (`1.0` is `1`), the way the
/// backend's query parser writes numbers.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_are_sorted() {
        let query = to_query_string(&json!({"b": 2, "a": 1, "c": true})).unwrap();
        assert_eq!(query, "a=1&b=2&c=true");
    }

    #[test]
    fn strict_percent_encoding() {
        let query = to_query_string(&json!({"q": "hello world!", "k&y": "a=b"})).unwrap();
        assert_eq!(query, "k%26y=a%3Db&q=hello%20world%21");
    }

    #[test]
    fn arrays_repeat_the_key() {
        let query = to_query_string(&json!({"tag": ["x", "y"], "empty": []})).unwrap();
        assert_eq!(query, "tag=x&tag=y");
    }

    #[test]
    fn whole_floats_have_no_fraction() {
        let query = to_query_string(&json!({"x": 1.0, "y": 2.5, "z": -0.0, "n": [3.0, -7]})).unwrap();
        assert_eq!(query, "n=3&n=-7&x=1&y=2.5&z=0");
    }

    #[test]
    fn null_emits_bare_key() {
        let query = to_query_string(&json!({"flag": null, "ids": [1, null]})).unwrap();
        assert_eq!(query, "flag&ids=1&ids");
    }

    #[test]
    fn nested_objects_are_json_text() {
        let query = to_query_string(&json!({"filter": {"a": 1}})).unwrap();
        assert_eq!(query, "filter=%7B%22a%22%3A1%7D");
    }

    #[test]
    fn empty_object_is_empty_query() {
        assert_eq!(to_query_string(&json!({})).unwrap(), "");
    }

    #[test]
    fn non_object_is_rejected() {
        let err = to_query_string(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
        let err = to_query_string("plain").unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }
}
