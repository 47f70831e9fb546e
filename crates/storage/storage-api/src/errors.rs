//! Errors raised by the `HeapFile`/`HeapTable` layer.

use binary_helpers::bin_error::BinaryError;
use buffer::errors::BufferError;
use file::errors::FileError;
use page::errors::page_error::PageError;
use thiserror::Error;

/// Errors raised by `HeapFile` operations.
#[derive(Debug, Error)]
pub enum HeapFileError {
    #[error("heap file is closed")]
    Closed,
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Errors raised by `HeapTable` (`DbRelation`) operations.
#[derive(Debug, Error)]
pub enum HeapTableError {
    /// `DbRelation("can't handle NULLs")` from spec §4.3: a row is missing a
    /// value for one of the relation's declared columns.
    #[error("DbRelation: can't handle NULLs, missing value for column {column}")]
    Null { column: String },
    /// A marshaled row does not fit in a single block.
    #[error("DbRelation: row does not fit in a single block ({size} bytes)")]
    RowTooWide { size: usize },
    #[error(transparent)]
    Binary(#[from] BinaryError),
    #[error(transparent)]
    HeapFile(#[from] HeapFileError),
}
