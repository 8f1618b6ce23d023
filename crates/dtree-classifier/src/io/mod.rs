//! IO utilities for loading feature tables.

pub mod delimited_table;

pub use delimited_table::{read_feature_table, read_labeled_table, TableReaderConfig};
