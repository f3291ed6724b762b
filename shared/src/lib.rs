pub mod models;
pub mod utils;

pub use models::{FieldNames, FlatNode, NodeKind, OptionsConfig, Record, TreeConfig};
