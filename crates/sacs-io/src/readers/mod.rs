//! One reader per exported table. Each has a `read_*` entry point taking a
//! path and a `parse_*` function working on an already loaded [`RawTable`].
//!
//! [`RawTable`]: sacs_table::RawTable

pub mod assignments;
pub mod connectivity;
pub mod material;
pub mod nodes;
pub mod sections;

use std::path::Path;

use sacs_table::Header;

use crate::error::{ConvertError, Result};

pub(crate) fn require_column(header: &Header, name: &str, source: &str) -> Result<usize> {
    header
        .position(name)
        .ok_or_else(|| ConvertError::schema(source, name))
}

pub(crate) fn source_name(path: &Path) -> String {
    path.display().to_string()
}
