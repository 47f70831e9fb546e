//! A 1-based sequence of fixed-size blocks persisted to one file, the
//! record-number-keyed block container `HeapTable` is built on (spec §4.2).

use crate::errors::HeapFileError;
use crate::storage_manager::StorageManager;
use file::api::FileManager;
use page::page_id::{FileId, PageId};
use page::{BlockId, Page};
use std::sync::Arc;

/// An ordered sequence of blocks, keyed by 1-based `BlockId`, backed by one
/// file in the storage layer.
pub struct HeapFile<F: FileManager> {
    file_id: FileId,
    storage: Arc<StorageManager<F>>,
    closed: bool,
    last: u32,
}

impl<F: FileManager> HeapFile<F> {
    /// Wraps the file identified by `file_id` (already registered with a path
    /// in the file catalog by the caller) as a closed heap file.
    pub fn new(file_id: FileId, storage: Arc<StorageManager<F>>) -> Self {
        Self {
            file_id,
            storage,
            closed: true,
            last: 0,
        }
    }

    fn page_id(&self, block_id: BlockId) -> PageId {
        PageId::new(self.file_id, u32::from(block_id) - 1)
    }

    /// Creates the backing file exclusively and allocates block 1 as an
    /// empty slotted page.
    pub fn create(&mut self) -> Result<(), HeapFileError> {
        self.storage.create_file(self.file_id)?;
        self.closed = false;
        self.last = 0;
        self.get_new()?;
        Ok(())
    }

    /// Opens the file if it exists, creates it otherwise.
    pub fn create_if_not_exists(&mut self) -> Result<(), HeapFileError> {
        if self.storage.file_exists(self.file_id) {
            self.open()
        } else {
            self.create()
        }
    }

    /// Closes and deletes the backing file.
    pub fn drop(&mut self) -> Result<(), HeapFileError> {
        self.close();
        self.storage.remove_file(self.file_id)?;
        Ok(())
    }

    /// Marks the file open, reading the current block count from the store.
    pub fn open(&mut self) -> Result<(), HeapFileError> {
        if !self.closed {
            return Ok(());
        }
        self.last = self.storage.block_count(self.file_id)?;
        self.closed = false;
        Ok(())
    }

    /// Marks the file closed.
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<(), HeapFileError> {
        if self.closed {
            return Err(HeapFileError::Closed);
        }
        Ok(())
    }

    /// Allocates the next block, initializes it as an empty slotted page,
    /// persists it, and returns a copy of it.
    pub fn get_new(&mut self) -> Result<Page, HeapFileError> {
        self.ensure_open()?;
        let next = BlockId::new(self.last as u16 + 1);
        let page_id = self.page_id(next);

        {
            let mut guard = self.storage.new_page(page_id)?;
            *guard = Page::new_empty(next);
        }
        self.storage.flush(page_id)?;
        self.last += 1;

        let guard = self.storage.read_page(page_id)?;
        Ok(guard.clone())
    }

    /// Fetches block `block_id`.
    pub fn get(&self, block_id: BlockId) -> Result<Page, HeapFileError> {
        self.ensure_open()?;
        let page_id = self.page_id(block_id);
        let guard = self.storage.read_page(page_id)?;
        Ok(guard.clone())
    }

    /// Writes `block` back under its id.
    pub fn put(&self, block: &Page) -> Result<(), HeapFileError> {
        self.ensure_open()?;
        let page_id = self.page_id(block.block_id());
        {
            let mut guard = self.storage.write_page(page_id)?;
            *guard = block.clone();
        }
        self.storage.flush(page_id)?;
        Ok(())
    }

    /// Every block id ever allocated, in order: `1..=last`.
    pub fn block_ids(&self) -> Vec<BlockId> {
        (1..=self.last as u16).map(BlockId::new).collect()
    }
}
