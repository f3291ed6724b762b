use serde_json::Value;
use shared::models::{NodeKind, Record};

use crate::error::{Result, ShapeError};

pub const CHILDREN_FIELD: &str = "children";

pub fn keep_all(_node: &Value) -> bool {
    true
}

pub fn identity_node(fields: Record, _kind: NodeKind) -> Record {
    fields
}

// Prunes `forest` bottom-up. A node with surviving children is kept as a
// branch; a leaf is kept only if `predicate` accepts it. A `null` node, or a
// `children` value that is not a list, fails the whole call.
pub fn filter_tree<P, H>(forest: &Value, predicate: P, node_handle: H) -> Result<Vec<Value>>
where
    P: Fn(&Value) -> bool,
    H: Fn(Record, NodeKind) -> Record,
{
    let Value::Array(roots) = forest else {
        tracing::debug!("Forest is not a list, nothing to filter");
        return Ok(Vec::new());
    };
    let mut kept = Vec::with_capacity(roots.len());
    for (index, node) in roots.iter().enumerate() {
        if let Some(node) = process_node(node, &predicate, &node_handle, &[index])? {
            kept.push(node);
        }
    }
    Ok(kept)
}

fn process_node<P, H>(node: &Value, predicate: &P, node_handle: &H, path: &[usize]) -> Result<Option<Value>>
where
    P: Fn(&Value) -> bool,
    H: Fn(Record, NodeKind) -> Record,
{
    let (children, rest) = split_children(node, path)?;

    let mut survivors = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        let mut child_path = path.to_vec();
        child_path.push(index);
        if let Some(child) = process_node(child, predicate, node_handle, &child_path)? {
            survivors.push(child);
        }
    }

    if !survivors.is_empty() {
        let mut fields = node_handle(rest, NodeKind::NoLeaf);
        fields.insert(CHILDREN_FIELD.to_string(), Value::Array(survivors));
        Ok(Some(Value::Object(fields)))
    } else if predicate(node) {
        Ok(Some(Value::Object(node_handle(rest, NodeKind::Leaf))))
    } else {
        tracing::trace!(?path, "Pruned node");
        Ok(None)
    }
}

// Splits a node into its child list and its remaining fields.
fn split_children<'a>(node: &'a Value, path: &[usize]) -> Result<(&'a [Value], Record)> {
    match node {
        Value::Null => Err(ShapeError::InvalidTree(format!("node at {:?} is null", path))),
        Value::Object(fields) => {
            let children: &[Value] = match fields.get(CHILDREN_FIELD) {
                None => &[][..],
                Some(Value::Array(children)) => children.as_slice(),
                Some(other) => {
                    return Err(ShapeError::InvalidTree(format!(
                        "children of node at {:?} must be a list, got {}",
                        path, other
                    )))
                }
            };
            let mut rest = fields.clone();
            rest.remove(CHILDREN_FIELD);
            Ok((children, rest))
        }
        // Scalars have no fields of their own.
        _ => Ok((&[][..], Record::new())),
    }
}
