//! Public API for the `file` crate

use crate::errors::FileError;
use crate::file_catalog::FileCatalog;
use page::page_id::{FileId, PageId};
use std::sync::Arc;

/// File manager public API
///
/// A `FileManager` manages a collection of fixed-size pages addressed by
/// `PageId`, grouped into files identified by `FileId`. Implementations are
/// free to choose the backing storage layout; the trait documents
/// method-level expectations.
pub trait FileManager {
    /// Creates a new file manager instance, resolving file names through
    /// `file_catalog`.
    fn new(file_catalog: Arc<FileCatalog>) -> Self;

    /// Creates the backing storage for `file_id` **exclusively**: fails with
    /// `FileError::AlreadyExists` if it already exists. `file_id` must
    /// already be registered in the file catalog.
    fn create_exclusive(&self, file_id: FileId) -> Result<(), FileError>;

    /// Deletes the backing storage for `file_id`.
    fn remove(&self, file_id: FileId) -> Result<(), FileError>;

    /// Whether `file_id`'s backing storage currently exists.
    fn exists(&self, file_id: FileId) -> bool;

    /// Number of fixed-size blocks currently stored for `file_id`.
    fn block_count(&self, file_id: FileId) -> Result<u32, FileError>;

    /// Reads the page identified by `page_id` into `destination`.
    ///
    /// Returns `Ok(true)` if the page existed and was copied into
    /// `destination`, `Ok(false)` if the page does not exist yet.
    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<bool, FileError>;

    /// Writes the contents of `page_data` as the page for `page_id`.
    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), FileError>;
}
