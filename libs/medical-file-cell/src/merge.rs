use serde_json::{Map, Value};

/// Shallow object merge: top-level keys of `incoming` replace those of
/// `current`, other keys are kept. Nested objects are replaced wholesale.
/// A non-object `current` is treated as empty.
pub fn shallow_merge(current: &Value, incoming: &Value) -> Value {
    let mut merged = match current {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    if let Value::Object(patch) = incoming {
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}
