// Engine library root
// Pure data-shaping helpers over in-memory records and trees.

pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod storage;
pub mod tree;
pub mod url;

pub use error::{Result, ShapeError};

// Data model types live in the shared crate.
pub use shared::models::{FieldNames, FlatNode, NodeKind, OptionsConfig, Record, TreeConfig};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
