// ── Response shape normalization ──
//
// The backend answers either with a bare payload or with an envelope
// `{ "data": <payload> }`. Both shapes are accepted; nothing outside this
// module needs to know which one arrived.

use serde_json::Value;

/// Normalize a collection response into an ordered sequence of records.
///
/// Accepts a bare JSON array or an object whose `data` field is an array.
/// Any other shape yields an empty sequence.
pub fn normalize_collection(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Normalize a single-record response.
///
/// An object whose `data` field is itself an object is unwrapped; any
/// other object is taken as the record. Non-object bodies yield `None`.
pub fn normalize_object(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => {
            if matches!(map.get("data"), Some(Value::Object(_))) {
                map.remove("data")
            } else {
                Some(Value::Object(map))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_is_returned_as_is() {
        let items = normalize_collection(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn envelope_array_is_unwrapped() {
        let items = normalize_collection(json!({"data": [{"id": 3}], "total": 1}));
        assert_eq!(items, vec![json!({"id": 3})]);
    }

    #[test]
    fn unknown_collection_shapes_are_empty() {
        assert!(normalize_collection(json!({"data": {"id": 1}})).is_empty());
        assert!(normalize_collection(json!({"items": []})).is_empty());
        assert!(normalize_collection(json!("oops")).is_empty());
        assert!(normalize_collection(Value::Null).is_empty());
    }

    #[test]
    fn object_envelope_is_unwrapped() {
        let record = normalize_object(json!({"data": {"id": 7, "name": "Bolt"}}));
        assert_eq!(record, Some(json!({"id": 7, "name": "Bolt"})));
    }

    #[test]
    fn bare_object_is_kept() {
        let record = normalize_object(json!({"id": 7, "data": "free text"}));
        assert_eq!(record, Some(json!({"id": 7, "data": "free text"})));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_eq!(normalize_object(json!([1, 2])), None);
        assert_eq!(normalize_object(Value::Null), None);
    }
}
