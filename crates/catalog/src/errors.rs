//! Errors raised while bootstrapping or querying the schema catalog.

use storage_api::errors::{HeapFileError, HeapTableError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("table {0} doesn't exist")]
    TableNotFound(String),
    #[error("index {0} on table {1} doesn't exist")]
    IndexNotFound(String, String),
    #[error("unknown catalog data type {0}")]
    UnknownDataType(String),
    #[error(transparent)]
    HeapTable(#[from] HeapTableError),
    #[error(transparent)]
    HeapFile(#[from] HeapFileError),
}
