//! The storage manager: the low-level plumbing a `HeapFile` builds on, wiring
//! together one file manager and its shared buffer cache.
use buffer::buffer::BufferManager;
use buffer::errors::BufferError;
use buffer::guards::{PageReadGuard, PageWriteGuard};
use file::api::FileManager;
use file::errors::FileError;
use page::page_id::{FileId, PageId};
use std::sync::Arc;

/// The storage manager
#[derive(Debug)]
pub struct StorageManager<F: FileManager> {
    file_manager: Arc<F>,
    buffer_manager: Arc<BufferManager<F>>,
}

impl<F: FileManager> StorageManager<F> {
    /// Creates a new instance of the `StorageManager`
    pub fn new(file_manager: Arc<F>, buffer_manager: Arc<BufferManager<F>>) -> Self {
        Self {
            file_manager,
            buffer_manager,
        }
    }

    /// Obtain a `&Page` via `PageReadGuard` for the provided `PageId`
    pub fn read_page(&self, page_id: PageId) -> Result<PageReadGuard<'_>, BufferError> {
        self.buffer_manager.read_page(page_id)
    }

    /// Obtain a `&mut Page` via `PageWriteGuard` for the provided `PageId`
    pub fn write_page(&self, page_id: PageId) -> Result<PageWriteGuard<'_>, BufferError> {
        self.buffer_manager.read_page_mut(page_id)
    }

    /// Initialize a new `Page` on the buffer for the provided `PageId` and obtain a `&mut Page`
    /// via a `PageWriteGuard`
    pub fn new_page(&self, page_id: PageId) -> Result<PageWriteGuard<'_>, BufferError> {
        self.buffer_manager.allocate_new_page(page_id)
    }

    /// Persists the current in-buffer contents of `page_id` back to disk.
    pub fn flush(&self, page_id: PageId) -> Result<(), BufferError> {
        self.buffer_manager.flush_page(page_id)
    }

    /// Creates the backing file for `file_id` exclusively.
    pub fn create_file(&self, file_id: FileId) -> Result<(), FileError> {
        self.file_manager.create_exclusive(file_id)
    }

    /// Deletes the backing file for `file_id`.
    pub fn remove_file(&self, file_id: FileId) -> Result<(), FileError> {
        self.file_manager.remove(file_id)
    }

    /// Whether `file_id`'s backing file currently exists.
    pub fn file_exists(&self, file_id: FileId) -> bool {
        self.file_manager.exists(file_id)
    }

    /// Number of blocks currently persisted for `file_id`.
    pub fn block_count(&self, file_id: FileId) -> Result<u32, FileError> {
        self.file_manager.block_count(file_id)
    }
}
