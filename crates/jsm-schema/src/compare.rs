//! # Schema Comparison
//!
//! Structural equality for schema documents, used to check compiled schemas
//! against expected fixtures. `required` and `oneOf` arrays are compared as
//! multisets (their order carries no meaning); every other array, object,
//! and scalar must match exactly.

use serde_json::Value;

/// Keys whose array values are compared without regard to order.
const UNORDERED_KEYS: &[&str] = &["required", "oneOf"];

/// Whether two schema documents describe the same shape.
pub fn compare_schemas(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, va)| {
                    b.get(key).is_some_and(|vb| {
                        if UNORDERED_KEYS.contains(&key.as_str()) {
                            compare_unordered(va, vb)
                        } else {
                            compare_schemas(va, vb)
                        }
                    })
                })
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| compare_schemas(x, y))
        }
        _ => expected == actual,
    }
}

fn compare_unordered(expected: &Value, actual: &Value) -> bool {
    let (Value::Array(a), Value::Array(b)) = (expected, actual) else {
        return compare_schemas(expected, actual);
    };
    if a.len() != b.len() {
        return false;
    }
    // `compare_schemas` is an equivalence, so greedy matching is exact.
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        match (0..b.len()).find(|&j| !used[j] && compare_schemas(x, &b[j])) {
            Some(j) => {
                used[j] = true;
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_order_ignored() {
        let a = json!({"type": "object", "properties": {}, "required": ["a", "b"]});
        let b = json!({"type": "object", "properties": {}, "required": ["b", "a"]});
        assert!(compare_schemas(&a, &b));
    }

    #[test]
    fn test_one_of_order_ignored_recursively() {
        let a = json!({"oneOf": [
            {"type": "object", "properties": {}, "required": ["x", "y"]},
            {"type": "string"}
        ]});
        let b = json!({"oneOf": [
            {"type": "string"},
            {"type": "object", "properties": {}, "required": ["y", "x"]}
        ]});
        assert!(compare_schemas(&a, &b));
    }

    #[test]
    fn test_multiset_not_set() {
        let a = json!({"required": ["a", "a"]});
        let b = json!({"required": ["a", "b"]});
        assert!(!compare_schemas(&a, &b));
    }

    #[test]
    fn test_other_arrays_are_ordered() {
        let a = json!({"enum": [1, 2]});
        let b = json!({"enum": [2, 1]});
        assert!(!compare_schemas(&a, &b));
    }

    #[test]
    fn test_missing_and_extra_keys() {
        let a = json!({"type": "string"});
        let b = json!({"type": "string", "pattern": "^x$"});
        assert!(!compare_schemas(&a, &b));
        assert!(!compare_schemas(&b, &a));
    }

    #[test]
    fn test_scalar_mismatch() {
        assert!(!compare_schemas(&json!({"minimum": 18}), &json!({"minimum": 19})));
        assert!(compare_schemas(&json!("x"), &json!("x")));
    }
}
