//! An in-memory `FileManager`, used by tests that want heap-file/heap-table
//! behavior without touching disk.

use crate::api::FileManager;
use crate::errors::FileError;
use crate::file_catalog::FileCatalog;
use page::page_id::{FileId, PageId};
use page::PAGE_SIZE;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// An in-memory file manager, backing each "file" with a `HashSet` of created
/// block ids and a `HashMap` of their contents.
#[derive(Debug)]
pub struct InMemoryFileManager {
    file_catalog: Arc<FileCatalog>,
    created: RwLock<HashSet<FileId>>,
    pages: RwLock<HashMap<PageId, Box<[u8]>>>,
}

impl FileManager for InMemoryFileManager {
    fn new(file_catalog: Arc<FileCatalog>) -> Self {
        Self {
            file_catalog,
            created: RwLock::new(HashSet::new()),
            pages: RwLock::new(HashMap::new()),
        }
    }

    fn create_exclusive(&self, file_id: FileId) -> Result<(), FileError> {
        if self.file_catalog.get_file_name(file_id).is_none() {
            return Err(FileError::NotFound { file_id });
        }
        let mut created = self.created.write().unwrap();
        if !created.insert(file_id) {
            return Err(FileError::AlreadyExists { file_id });
        }
        Ok(())
    }

    fn remove(&self, file_id: FileId) -> Result<(), FileError> {
        if !self.created.write().unwrap().remove(&file_id) {
            return Err(FileError::NotFound { file_id });
        }
        self.pages
            .write()
            .unwrap()
            .retain(|page_id, _| page_id.file_id != file_id);
        Ok(())
    }

    fn exists(&self, file_id: FileId) -> bool {
        self.created.read().unwrap().contains(&file_id)
    }

    fn block_count(&self, file_id: FileId) -> Result<u32, FileError> {
        if !self.exists(file_id) {
            return Err(FileError::NotFound { file_id });
        }
        let max = self
            .pages
            .read()
            .unwrap()
            .keys()
            .filter(|page_id| page_id.file_id == file_id)
            .map(|page_id| page_id.page_number + 1)
            .max()
            .unwrap_or(0);
        Ok(max)
    }

    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<bool, FileError> {
        if let Some(page) = self.pages.read().unwrap().get(&page_id) {
            destination.copy_from_slice(page);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), FileError> {
        if page_data.len() != PAGE_SIZE {
            return Err(FileError::Io {
                file_id: page_id.file_id,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "page_data is not exactly PAGE_SIZE bytes",
                ),
            });
        }
        let boxed = page_data.to_vec().into_boxed_slice();
        self.pages.write().unwrap().insert(page_id, boxed);
        Ok(())
    }
}
