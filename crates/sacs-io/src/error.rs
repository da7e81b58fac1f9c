//! Error types for sacs-io

use sacs_model::AssemblyError;
use sacs_table::TableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{source_name}: column '{column}' not found, check the export")]
    Schema { source_name: String, column: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn schema(source_name: &str, column: &str) -> Self {
        ConvertError::Schema {
            source_name: source_name.to_string(),
            column: column.to_string(),
        }
    }
}
