use crate::api::FileManager;
use crate::errors::FileError;
use crate::file_catalog::FileCatalog;
use page::page_id::{FileId, PageId};
use page::PAGE_SIZE;
use std::collections::HashMap;
use std::fs;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

/// A disk based file manager
#[derive(Debug)]
pub struct DiskFileManager {
    files: RwLock<HashMap<FileId, Arc<File>>>,
    file_catalog: Arc<FileCatalog>,
}

impl FileManager for DiskFileManager {
    fn new(file_catalog: Arc<FileCatalog>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            file_catalog,
        }
    }

    fn create_exclusive(&self, file_id: FileId) -> Result<(), FileError> {
        let path = self.path_for(file_id)?;
        Self::ensure_parent_dir(&path).map_err(|source| FileError::Io { file_id, source })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::AlreadyExists {
                    FileError::AlreadyExists { file_id }
                } else {
                    FileError::Io { file_id, source }
                }
            })?;

        self.files.write().unwrap().insert(file_id, Arc::new(file));
        Ok(())
    }

    fn remove(&self, file_id: FileId) -> Result<(), FileError> {
        self.files.write().unwrap().remove(&file_id);
        let path = self.path_for(file_id)?;
        fs::remove_file(&path).map_err(|source| FileError::Io { file_id, source })
    }

    fn exists(&self, file_id: FileId) -> bool {
        self.path_for(file_id).map(|p| p.exists()).unwrap_or(false)
    }

    fn block_count(&self, file_id: FileId) -> Result<u32, FileError> {
        let file = self.get_or_open_file(file_id)?;
        let len = file
            .metadata()
            .map_err(|source| FileError::Io { file_id, source })?
            .len();
        Ok((len / PAGE_SIZE as u64) as u32)
    }

    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> Result<bool, FileError> {
        let file = self.get_or_open_file(page_id.file_id)?;
        let offset = (page_id.page_number as usize * PAGE_SIZE) as u64;

        match Self::read_at(file.as_ref(), destination, offset) {
            Ok(n) => Ok(n == PAGE_SIZE),
            Err(source) => Err(FileError::Io {
                file_id: page_id.file_id,
                source,
            }),
        }
    }

    fn write_page(&self, page_id: PageId, page_data: &[u8]) -> Result<(), FileError> {
        let file = self.get_or_open_file(page_id.file_id)?;
        let offset = (page_id.page_number as usize * PAGE_SIZE) as u64;

        let mut written = 0;
        while written < PAGE_SIZE {
            let n = Self::write_at(file.as_ref(), &page_data[written..], offset + written as u64)
                .map_err(|source| FileError::Io {
                    file_id: page_id.file_id,
                    source,
                })?;

            if n == 0 {
                return Err(FileError::Io {
                    file_id: page_id.file_id,
                    source: std::io::Error::new(std::io::ErrorKind::WriteZero, "wrote 0 bytes"),
                });
            }

            written += n;
        }
        Ok(())
    }
}

impl DiskFileManager {
    fn path_for(&self, file_id: FileId) -> Result<std::path::PathBuf, FileError> {
        self.file_catalog
            .get_file_name(file_id)
            .ok_or(FileError::NotFound { file_id })
    }

    fn get_or_open_file(&self, file_id: FileId) -> Result<Arc<File>, FileError> {
        // 1. Fast path — read lock
        {
            let files = self.files.read().unwrap();
            if let Some(file) = files.get(&file_id) {
                return Ok(Arc::clone(file));
            }
        }

        // 2. Slow path — write lock
        let mut files = self.files.write().unwrap();

        // 3. Double-check
        if let Some(file) = files.get(&file_id) {
            return Ok(Arc::clone(file));
        }

        // 4. Actually open file
        let path = self.path_for(file_id)?;
        Self::ensure_parent_dir(&path).map_err(|source| FileError::Io { file_id, source })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| FileError::Io { file_id, source })?;

        let file = Arc::new(file);
        files.insert(file_id, Arc::clone(&file));

        Ok(file)
    }

    #[inline]
    fn read_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            file.seek_read(buf, offset)
        }
    }

    #[inline]
    fn write_at(file: &File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            file.write_at(buf, offset)
        }

        #[cfg(windows)]
        {
            file.seek_write(buf, offset)
        }
    }

    fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
