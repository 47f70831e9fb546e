//! Owner of the process-wide singletons the REPL needs for its whole
//! lifetime: the page store stack plus the bootstrapped catalog and its
//! `SQLExec` (spec §4.4/§4.5/§9, SPEC_FULL §12).

use crate::config::EngineConfig;
use buffer::buffer::BufferManager;
use catalog::{FileIdAllocator, Indices, Tables};
use file::api::FileManager;
use file::disk_file_manager::DiskFileManager;
use file::file_catalog::FileCatalog;
use sql_exec::SQLExec;
use std::sync::Arc;
use storage_api::storage_manager::StorageManager;
use thiserror::Error;

/// `_tables`, `_columns`, `_indices` are given fixed, well-known file ids;
/// every relation/index opened afterwards gets the next free one.
const TABLES_FILE_ID: u32 = 1;
const COLUMNS_FILE_ID: u32 = 2;
const INDICES_FILE_ID: u32 = 3;
const FIRST_USER_FILE_ID: u32 = 4;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("failed to create data directory {0}: {1}")]
    DataDir(std::path::PathBuf, std::io::Error),
    #[error(transparent)]
    Catalog(#[from] catalog::errors::CatalogError),
}

pub struct EngineEnvironment {
    pub file_manager: Arc<DiskFileManager>,
    pub buffer: Arc<BufferManager<DiskFileManager>>,
    pub storage: Arc<StorageManager<DiskFileManager>>,
    pub file_catalog: Arc<FileCatalog>,
    pub engine_config: EngineConfig,
    pub sql_exec: SQLExec<DiskFileManager>,
}

impl EngineEnvironment {
    pub fn new(config: EngineConfig) -> Result<Self, EnvironmentError> {
        std::fs::create_dir_all(&config.storage.data_dir)
            .map_err(|e| EnvironmentError::DataDir(config.storage.data_dir.clone(), e))?;

        let file_catalog = Arc::new(FileCatalog::new());
        let file_manager = Arc::new(DiskFileManager::new(file_catalog.clone()));
        let buffer = Arc::new(BufferManager::new(
            file_manager.clone(),
            config.storage.buffer_pages.get(),
        ));
        let storage = Arc::new(StorageManager::new(file_manager.clone(), buffer.clone()));

        let file_ids = FileIdAllocator::starting_at(FIRST_USER_FILE_ID);
        let mut tables = Tables::new(
            storage.clone(),
            file_catalog.clone(),
            config.storage.data_dir.clone(),
            file_ids.clone(),
            TABLES_FILE_ID,
            COLUMNS_FILE_ID,
        )?;
        let indices = Indices::new(
            &mut tables,
            storage.clone(),
            file_catalog.clone(),
            config.storage.data_dir.clone(),
            file_ids,
            INDICES_FILE_ID,
        )?;
        let sql_exec = SQLExec::new(tables, indices);

        Ok(Self {
            file_manager,
            buffer,
            storage,
            file_catalog,
            engine_config: config,
            sql_exec,
        })
    }
}
