//! `HeapIndex`: the minimal physical `DbIndex` named by spec §4.4/§4.5.
//!
//! The source and spec both leave the actual B-tree index build
//! unspecified; this gives `CREATE INDEX`/`DROP INDEX` real physical side
//! effects (a dedicated, empty heap file per index) without inventing an
//! index algorithm neither names.

use crate::errors::CatalogError;
use file::api::FileManager;
use storage_api::heap_file::HeapFile;

/// A physical index: its key-column order (already recorded in `_indices`)
/// and a dedicated heap file standing in for its future index pages.
pub struct HeapIndex<F: FileManager> {
    column_names: Vec<String>,
    file: HeapFile<F>,
}

impl<F: FileManager> HeapIndex<F> {
    pub(crate) fn new(column_names: Vec<String>, file: HeapFile<F>) -> Self {
        Self { column_names, file }
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Physically creates the index's backing file.
    pub fn create(&mut self) -> Result<(), CatalogError> {
        self.file.create_if_not_exists()?;
        Ok(())
    }

    /// Physically drops the index's backing file.
    pub fn drop(&mut self) -> Result<(), CatalogError> {
        self.file.drop()?;
        Ok(())
    }
}
