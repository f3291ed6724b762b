use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// An open, schema-less row: field name to value, in insertion order.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub label: String,
    pub value: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        OptionsConfig {
            label: "label".to_string(),
            value: "value".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub key: String,
    pub children: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            key: "id".to_string(),
            children: "children".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    pub field_names: FieldNames,
    // `parentId` given to root-level nodes.
    pub root_id: Value,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            field_names: FieldNames::default(),
            root_id: Value::String("root".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "leaf")]
    Leaf,
    #[serde(rename = "noLeaf")]
    NoLeaf,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Leaf => "leaf",
            NodeKind::NoLeaf => "noLeaf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatNode {
    #[serde(flatten)]
    pub fields: Record,
    // Id of the governing parent. `None` when the parent had no id.
    #[serde(rename = "parentId")]
    pub parent_id: Option<Value>,
    // Ids of the direct children, in order. Children without an id show up as `null`.
    pub children: Vec<Value>,
    #[serde(skip)]
    pub visit_order: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tree_config_fills_missing_fields_with_defaults() {
        let config: TreeConfig =
            serde_json::from_value(json!({ "fieldNames": { "key": "code" } })).unwrap();
        assert_eq!(config.field_names.key, "code");
        assert_eq!(config.field_names.children, "children");
        assert_eq!(config.root_id, json!("root"));
    }

    #[test]
    fn flat_node_serializes_parent_and_children_without_visit_order() {
        let mut fields = Record::new();
        fields.insert("id".into(), json!(2));
        fields.insert("name".into(), json!("b"));
        let node = FlatNode {
            fields,
            parent_id: Some(json!(1)),
            children: vec![json!(3)],
            visit_order: 7,
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({ "id": 2, "name": "b", "parentId": 1, "children": [3] })
        );
    }

    #[test]
    fn node_kind_names() {
        assert_eq!(NodeKind::Leaf.as_str(), "leaf");
        assert_eq!(serde_json::to_value(NodeKind::NoLeaf).unwrap(), json!("noLeaf"));
    }
}
