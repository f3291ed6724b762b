// Field name remapping for records and trees
use std::collections::HashMap;

use serde_json::Value;
use shared::models::Record;

pub type FieldMap = HashMap<String, String>;

// Copies `record`, renaming every field listed in `mapping` in place.
// Fields keep their position. When a new name collides with another field,
// the value that comes later in the record wins the first one's slot.
pub fn rename_fields(record: &Record, mapping: &FieldMap) -> Record {
    let mut renamed = Record::new();
    for (key, value) in record {
        let name = mapping.get(key).unwrap_or(key);
        renamed.insert(name.clone(), value.clone());
    }
    renamed
}

// Renames fields on every node of `forest`, descending through `children_field`.
// The nested list ends up under the mapped name of `children_field`. Nodes
// that are not objects are copied as they are. A non-array forest gives an
// empty result.
pub fn rename_tree_fields(forest: &Value, mapping: &FieldMap, children_field: &str) -> Vec<Value> {
    match forest {
        Value::Array(nodes) => nodes
            .iter()
            .map(|node| rename_node(node, mapping, children_field))
            .collect(),
        _ => {
            tracing::debug!("Forest is not a list, nothing to rename");
            Vec::new()
        }
    }
}

fn rename_node(node: &Value, mapping: &FieldMap, children_field: &str) -> Value {
    let Value::Object(fields) = node else {
        return node.clone();
    };
    let mut renamed = rename_fields(fields, mapping);
    if let Some(children @ Value::Array(_)) = fields.get(children_field) {
        let target = mapping
            .get(children_field)
            .map(String::as_str)
            .unwrap_or(children_field);
        let nested = rename_tree_fields(children, mapping, children_field);
        renamed.insert(target.to_string(), Value::Array(nested));
    }
    Value::Object(renamed)
}
