// Runtime configuration for the shaping helpers
pub mod settings;

pub use settings::{CsvSettings, DateSettings, ShapingSettings};
