//! Deep merge of config layers.

use serde_json::Value;

/// Fold `layer` into `target`. Objects merge key by key; any other value in
/// the layer (arrays included) replaces what was there.
pub(super) fn deep_merge(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(target), Value::Object(layer)) => {
            for (key, value) in layer {
                match target.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::deep_merge;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_override() {
        let mut base = json!({ "gateway": { "model": "a", "timeout_secs": 10 } });
        deep_merge(&mut base, json!({ "gateway": { "model": "b" }, "chat": {} }));
        assert_eq!(
            base,
            json!({ "gateway": { "model": "b", "timeout_secs": 10 }, "chat": {} })
        );
    }

    #[test]
    fn scalar_layer_replaces_object() {
        let mut base = json!({ "chat": { "greeting": "hi" } });
        deep_merge(&mut base, json!({ "chat": null }));
        assert_eq!(base, json!({ "chat": null }));
    }
}
