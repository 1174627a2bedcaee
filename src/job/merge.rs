use serde_json::{Map, Value};

/// Recursively merge `overrides` into `target`.
///
/// A key recurses only when both sides hold an object; in every other case
/// (new key, scalar, array, or object replacing a scalar) the override value
/// is cloned into `target`. Overrides always win on conflict and keys the
/// overrides do not mention are left untouched.
pub fn deep_merge(target: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (target.get_mut(key), value)
        {
            deep_merge(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
