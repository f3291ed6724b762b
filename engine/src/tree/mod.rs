// Tree transforms: flatten into an id-indexed map, rebuild from it, and
// prune by a leaf predicate.
pub mod filter;
pub mod flatten;

pub use filter::{filter_tree, identity_node, keep_all};
pub use flatten::{flatten_tree, rebuild_tree, FlatTree};
