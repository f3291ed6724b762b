// Record-level transforms: option data, run annotation, field renaming and
// a delimited-text record source.
pub mod csv_records;
pub mod options;
pub mod rename;
pub mod repeated_rows;

pub use options::{list_to_map, list_to_obj, obj_to_list, obj_to_map, options_handle, OptionMap, OptionSet};
pub use rename::{rename_fields, rename_tree_fields, FieldMap};
pub use repeated_rows::{annotate_runs, total_field, GroupKeys};
