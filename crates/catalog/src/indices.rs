//! The `_indices` schema relation and the `Indices` catalog singleton
//! (spec §4.4).

use crate::errors::CatalogError;
use crate::index::HeapIndex;
use crate::tables::Tables;
use crate::FileIdAllocator;
use file::api::FileManager;
use file::file_catalog::FileCatalog;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use storage_api::handle::Handle;
use storage_api::heap_file::HeapFile;
use storage_api::heap_table::HeapTable;
use storage_api::storage_manager::StorageManager;
use storage_api::value::{ColumnAttribute, Row, Value};

/// The `_indices` relation plus the lazily-opened cache of physical
/// `HeapIndex`es the catalog has touched this process.
pub struct Indices<F: FileManager> {
    storage: Arc<StorageManager<F>>,
    file_catalog: Arc<FileCatalog>,
    data_dir: PathBuf,
    file_ids: FileIdAllocator,
    indices: HeapTable<F>,
    cache: HashMap<(String, String), HeapIndex<F>>,
}

impl<F: FileManager> Indices<F> {
    /// Ensures `_indices` physically exists, has its self-row inserted in
    /// `_tables`/`_columns`, and is ready to serve `get_index`.
    pub fn new(
        tables: &mut Tables<F>,
        storage: Arc<StorageManager<F>>,
        file_catalog: Arc<FileCatalog>,
        data_dir: PathBuf,
        file_ids: FileIdAllocator,
        indices_file_id: u32,
    ) -> Result<Self, CatalogError> {
        file_catalog.add_file(indices_file_id, data_dir.join("_indices.db"));
        let file = HeapFile::new(indices_file_id, Arc::clone(&storage));
        let mut indices = HeapTable::new(
            "_indices",
            vec![
                "table_name".to_string(),
                "index_name".to_string(),
                "seq_in_index".to_string(),
                "column_name".to_string(),
                "index_type".to_string(),
                "is_unique".to_string(),
            ],
            vec![
                ColumnAttribute::Text,
                ColumnAttribute::Text,
                ColumnAttribute::Int,
                ColumnAttribute::Text,
                ColumnAttribute::Text,
                ColumnAttribute::Int,
            ],
            file,
        );
        indices.create_if_not_exists()?;

        tables.register_self_row(
            "_indices",
            &[
                ("table_name", "TEXT"),
                ("index_name", "TEXT"),
                ("seq_in_index", "INT"),
                ("column_name", "TEXT"),
                ("index_type", "TEXT"),
                ("is_unique", "INT"),
            ],
        )?;

        Ok(Self {
            storage,
            file_catalog,
            data_dir,
            file_ids,
            indices,
            cache: HashMap::new(),
        })
    }

    pub fn schema(&self) -> (&[String], &[ColumnAttribute]) {
        (self.indices.column_names(), self.indices.column_attributes())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_row(
        &mut self,
        table_name: &str,
        index_name: &str,
        seq_in_index: i32,
        column_name: &str,
        index_type: &str,
        is_unique: bool,
    ) -> Result<Handle, CatalogError> {
        let mut row = Row::new();
        row.insert("table_name".to_string(), Value::Text(table_name.to_string()));
        row.insert("index_name".to_string(), Value::Text(index_name.to_string()));
        row.insert("seq_in_index".to_string(), Value::Int(seq_in_index));
        row.insert(
            "column_name".to_string(),
            Value::Text(column_name.to_string()),
        );
        row.insert("index_type".to_string(), Value::Text(index_type.to_string()));
        row.insert(
            "is_unique".to_string(),
            Value::Int(if is_unique { 1 } else { 0 }),
        );
        Ok(self.indices.insert(&row)?)
    }

    pub fn delete_row(&mut self, handle: Handle) -> Result<(), CatalogError> {
        Ok(self.indices.delete(handle)?)
    }

    /// `_indices` rows matching `table_name`, and `index_name` when given.
    pub fn select(
        &self,
        table_name: &str,
        index_name: Option<&str>,
    ) -> Result<Vec<(Handle, Row)>, CatalogError> {
        let mut rows = Vec::new();
        for handle in self.indices.select()? {
            let row = self.indices.project(handle)?;
            let matches_table = matches!(row.get("table_name"), Some(Value::Text(t)) if t == table_name);
            if !matches_table {
                continue;
            }
            if let Some(filter) = index_name {
                match row.get("index_name") {
                    Some(Value::Text(n)) if n == filter => {}
                    _ => continue,
                }
            }
            rows.push((handle, row));
        }
        Ok(rows)
    }

    /// Resolves (opening its backing file on first access) the physical
    /// index `(table_name, index_name)`, reading its key-column order from
    /// `_indices` sorted by `seq_in_index`.
    pub fn get_index(
        &mut self,
        table_name: &str,
        index_name: &str,
    ) -> Result<&mut HeapIndex<F>, CatalogError> {
        let key = (table_name.to_string(), index_name.to_string());
        if !self.cache.contains_key(&key) {
            let mut rows = self.select(table_name, Some(index_name))?;
            if rows.is_empty() {
                return Err(CatalogError::IndexNotFound(
                    index_name.to_string(),
                    table_name.to_string(),
                ));
            }
            rows.sort_by_key(|(_, row)| match row.get("seq_in_index") {
                Some(Value::Int(n)) => *n,
                _ => 0,
            });
            let column_names = rows
                .iter()
                .filter_map(|(_, row)| match row.get("column_name") {
                    Some(Value::Text(c)) => Some(c.clone()),
                    _ => None,
                })
                .collect();

            let file_id = self.file_ids.next();
            let path = self
                .data_dir
                .join(format!("{table_name}_{index_name}.idx"));
            self.file_catalog.add_file(file_id, path);
            let file = HeapFile::new(file_id, Arc::clone(&self.storage));
            let index = HeapIndex::new(column_names, file);
            self.cache.insert(key.clone(), index);
        }
        Ok(self.cache.get_mut(&key).expect("just inserted"))
    }

    /// Removes a resolved index from the cache without touching its
    /// physical file — used after `HeapIndex::drop` has already run.
    pub fn forget(&mut self, table_name: &str, index_name: &str) {
        self.cache
            .remove(&(table_name.to_string(), index_name.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use file::in_memory_file_manager::InMemoryFileManager;

    fn new_indices() -> (Tables<InMemoryFileManager>, Indices<InMemoryFileManager>) {
        let file_catalog = Arc::new(FileCatalog::new());
        let file_manager = Arc::new(InMemoryFileManager::new(file_catalog.clone()));
        let buffer = Arc::new(buffer::buffer::BufferManager::new(file_manager.clone(), 8));
        let storage = Arc::new(StorageManager::new(file_manager, buffer));
        let file_ids = FileIdAllocator::starting_at(4);
        let mut tables = Tables::new(
            Arc::clone(&storage),
            Arc::clone(&file_catalog),
            PathBuf::from("data"),
            file_ids.clone(),
            1,
            2,
        )
        .unwrap();
        let indices = Indices::new(&mut tables, storage, file_catalog, PathBuf::from("data"), file_ids, 3)
            .unwrap();
        (tables, indices)
    }

    #[test]
    fn new_registers_the_indices_schema_table_itself() {
        let (mut tables, _indices) = new_indices();
        assert!(tables.list_table_handle("_indices").unwrap().is_some());
    }

    #[test]
    fn get_index_not_found_before_any_row_is_inserted() {
        let (_tables, mut indices) = new_indices();
        assert!(matches!(
            indices.get_index("foo", "fx"),
            Err(CatalogError::IndexNotFound(_, _))
        ));
    }

    #[test]
    fn get_index_resolves_columns_sorted_by_seq() {
        let (_tables, mut indices) = new_indices();
        indices
            .insert_row("foo", "fx", 2, "b", "BTREE", true)
            .unwrap();
        indices
            .insert_row("foo", "fx", 1, "a", "BTREE", true)
            .unwrap();

        let index = indices.get_index("foo", "fx").unwrap();
        assert_eq!(index.column_names().to_vec(), vec!["a".to_string(), "b".to_string()]);
        index.create().unwrap();
    }

    #[test]
    fn forget_drops_the_cached_entry_without_touching_storage() {
        let (_tables, mut indices) = new_indices();
        indices
            .insert_row("foo", "fx", 1, "a", "BTREE", true)
            .unwrap();
        indices.get_index("foo", "fx").unwrap().create().unwrap();
        indices.forget("foo", "fx");
        // Resolving again allocates a fresh cache entry from the same rows.
        assert!(indices.get_index("foo", "fx").is_ok());
    }
}
