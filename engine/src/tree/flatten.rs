use std::collections::HashMap;

use serde_json::Value;
use shared::models::{FlatNode, Record, TreeConfig};
use shared::utils::{is_truthy, is_zero_number, property_key};

pub type FlatTree = HashMap<String, FlatNode>;

// Nodes are written in post-order. A node whose id is neither truthy nor the
// number zero is left out, but its children are still visited and still
// record that id as their parent (`None` when the field is missing). Root
// nodes get `config.root_id` as parent. A non-array forest gives an empty map.
pub fn flatten_tree(forest: &Value, config: &TreeConfig) -> FlatTree {
    let mut acc = Accumulator::default();
    let Value::Array(roots) = forest else {
        tracing::debug!("Forest is not a list, nothing to flatten");
        return acc.flat;
    };
    for node in roots {
        visit(node, Some(&config.root_id), config, &mut acc);
    }
    acc.flat
}

#[derive(Default)]
struct Accumulator {
    flat: FlatTree,
    written: usize,
}

fn visit(node: &Value, parent_id: Option<&Value>, config: &TreeConfig, acc: &mut Accumulator) {
    let names = &config.field_names;
    let fields = node.as_object();
    let node_id = fields.and_then(|f| f.get(&names.key));

    let mut children = Vec::new();
    if let Some(Value::Array(child_list)) = fields.and_then(|f| f.get(&names.children)) {
        for child in child_list {
            visit(child, node_id, config, acc);
            let child_id = child.as_object().and_then(|c| c.get(&names.key));
            children.push(child_id.cloned().unwrap_or(Value::Null));
        }
    }

    if !(is_truthy(node_id) || is_zero_number(node_id)) {
        tracing::trace!(?node_id, "Skipping node without a usable id");
        return;
    }

    let mut record: Record = fields.cloned().unwrap_or_default();
    record.remove("parentId");
    record.remove("children");
    let key = property_key(node_id);
    let entry = FlatNode {
        fields: record,
        parent_id: parent_id.cloned(),
        children,
        visit_order: acc.written,
    };
    acc.written += 1;
    if acc.flat.insert(key.clone(), entry).is_some() {
        tracing::warn!(id = %key, "Duplicate node id, later node replaces the earlier one");
    }
}

// Roots are the nodes whose parent is `config.root_id`, in their original
// order. Child ids missing from the map are skipped together with their
// subtrees. The child list is written under the configured children field
// only when it is not empty.
pub fn rebuild_tree(flat: &FlatTree, config: &TreeConfig) -> Vec<Value> {
    let mut roots: Vec<&FlatNode> = flat
        .values()
        .filter(|node| node.parent_id.as_ref() == Some(&config.root_id))
        .collect();
    roots.sort_by_key(|node| node.visit_order);
    roots
        .into_iter()
        .map(|node| build_node(node, flat, config, 0))
        .collect()
}

fn build_node(node: &FlatNode, flat: &FlatTree, config: &TreeConfig, depth: usize) -> Value {
    let mut fields = node.fields.clone();
    // A node listing itself as a descendant would recurse forever.
    if depth <= flat.len() {
        let children: Vec<Value> = node
            .children
            .iter()
            .filter(|id| !id.is_null())
            .filter_map(|id| flat.get(&property_key(Some(id))))
            .map(|child| build_node(child, flat, config, depth + 1))
            .collect();
        if !children.is_empty() {
            fields.insert(config.field_names.children.clone(), Value::Array(children));
        } else {
            fields.remove(&config.field_names.children);
        }
    }
    Value::Object(fields)
}
