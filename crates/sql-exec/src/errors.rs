//! DDL precondition violations and the error surface `SQLExec::execute`
//! returns to its caller (spec §4.5/§7).

use catalog::errors::CatalogError;
use storage_api::errors::HeapTableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlExecError {
    #[error("Column Attribute Type Not Supported")]
    UnsupportedColumnType,
    #[error("Cannot drop a schema table!")]
    CannotDropSchemaTable,
    #[error("Table {0} doesn't exist")]
    TableNotFound(String),
    #[error("Column {0} doesn't exist in {1}")]
    ColumnNotFound(String, String),
    #[error("Index not found")]
    IndexNotFound,
    #[error("unsupported statement")]
    UnsupportedStatement,
    /// Mirrors the source's `"DbRelationError: ..."` wrapping: a schema or
    /// heap-table failure surfaced during DDL, after rollback has run.
    #[error("DbRelationError: {0}")]
    Relation(String),
}

impl From<CatalogError> for SqlExecError {
    fn from(e: CatalogError) -> Self {
        SqlExecError::Relation(e.to_string())
    }
}

impl From<HeapTableError> for SqlExecError {
    fn from(e: HeapTableError) -> Self {
        SqlExecError::Relation(e.to_string())
    }
}
