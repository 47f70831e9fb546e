//! The `_tables` schema relation and the `Tables` catalog singleton: the
//! fixed point that records every user relation (and itself) (spec §4.4).

use crate::columns::Columns;
use crate::errors::CatalogError;
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

const SCHEMA_TABLES: [&str; 3] = ["_tables", "_columns", "_indices"];

/// The `_tables` relation plus the lazily-opened cache of every user
/// relation the catalog has touched this process.
pub struct Tables<F: FileManager> {
    storage: Arc<StorageManager<F>>,
    file_catalog: Arc<FileCatalog>,
    data_dir: PathBuf,
    file_ids: FileIdAllocator,
    tables: HeapTable<F>,
    columns: Columns<F>,
    cache: HashMap<String, HeapTable<F>>,
}

impl<F: FileManager> Tables<F> {
    /// Ensures `_tables` and `_columns` physically exist and have their
    /// self-rows inserted. Idempotent: safe to call once per process.
    pub fn new(
        storage: Arc<StorageManager<F>>,
        file_catalog: Arc<FileCatalog>,
        data_dir: PathBuf,
        file_ids: FileIdAllocator,
        tables_file_id: u32,
        columns_file_id: u32,
    ) -> Result<Self, CatalogError> {
        file_catalog.add_file(tables_file_id, data_dir.join("_tables.db"));
        let tables_file = HeapFile::new(tables_file_id, Arc::clone(&storage));
        let mut tables = HeapTable::new(
            "_tables",
            vec!["table_name".to_string()],
            vec![ColumnAttribute::Text],
            tables_file,
        );
        tables.create_if_not_exists()?;

        file_catalog.add_file(columns_file_id, data_dir.join("_columns.db"));
        let columns_file = HeapFile::new(columns_file_id, Arc::clone(&storage));
        let columns = Columns::open(columns_file)?;

        let mut instance = Self {
            storage,
            file_catalog,
            data_dir,
            file_ids,
            tables,
            columns,
            cache: HashMap::new(),
        };
        instance.register_self_row("_tables", &[("table_name", "TEXT")])?;
        instance.register_self_row(
            "_columns",
            &[
                ("table_name", "TEXT"),
                ("column_name", "TEXT"),
                ("data_type", "TEXT"),
            ],
        )?;
        tracing::info!("catalog bootstrap complete");
        Ok(instance)
    }

    /// Idempotently records `name`'s presence in `_tables`/`_columns`, used
    /// both by this constructor (for `_tables`/`_columns` themselves) and by
    /// `Indices::new` (for `_indices`).
    pub fn register_self_row(
        &mut self,
        name: &str,
        columns: &[(&str, &str)],
    ) -> Result<(), CatalogError> {
        let already_present = self
            .tables
            .select()?
            .into_iter()
            .map(|h| self.tables.project(h))
            .any(|row| matches!(row, Ok(r) if r.get("table_name") == Some(&Value::Text(name.to_string()))));
        if already_present {
            return Ok(());
        }

        self.insert_table_row(name)?;
        for (column_name, data_type) in columns {
            self.columns.insert(name, column_name, data_type)?;
        }
        Ok(())
    }

    pub fn insert_table_row(&mut self, table_name: &str) -> Result<Handle, CatalogError> {
        let mut row = Row::new();
        row.insert("table_name".to_string(), Value::Text(table_name.to_string()));
        Ok(self.tables.insert(&row)?)
    }

    pub fn delete_table_row(&mut self, handle: Handle) -> Result<(), CatalogError> {
        Ok(self.tables.delete(handle)?)
    }

    /// The `_tables` row's handle for `name`, if one exists.
    pub fn list_table_handle(&mut self, name: &str) -> Result<Option<Handle>, CatalogError> {
        for handle in self.tables.select()? {
            let row = self.tables.project(handle)?;
            if matches!(row.get("table_name"), Some(Value::Text(t)) if t == name) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn columns(&mut self) -> &mut Columns<F> {
        &mut self.columns
    }

    pub fn tables_schema(&self) -> (&[String], &[ColumnAttribute]) {
        (self.tables.column_names(), self.tables.column_attributes())
    }

    /// Every `_tables` row excluding the three schema tables themselves
    /// (spec §4.5 SHOW TABLES).
    pub fn list_user_tables(&self) -> Result<Vec<Row>, CatalogError> {
        let mut rows = Vec::new();
        for handle in self.tables.select()? {
            let row = self.tables.project(handle)?;
            if let Some(Value::Text(name)) = row.get("table_name") {
                if !SCHEMA_TABLES.contains(&name.as_str()) {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }

    /// Opens (creating the backing file if it doesn't yet exist) the
    /// physical relation for `name`, using the column schema already
    /// declared for it in `_columns`. Used by `CREATE TABLE`'s physical step.
    pub fn create_relation(
        &mut self,
        name: &str,
        column_names: Vec<String>,
        column_attributes: Vec<ColumnAttribute>,
        if_not_exists: bool,
    ) -> Result<(), CatalogError> {
        let file_id = self.file_ids.next();
        let path = self.data_dir.join(format!("{name}.db"));
        self.file_catalog.add_file(file_id, path);
        let file = HeapFile::new(file_id, Arc::clone(&self.storage));
        let mut table = HeapTable::new(name, column_names, column_attributes, file);
        if if_not_exists {
            table.create_if_not_exists()?;
        } else {
            table.create()?;
        }
        tracing::debug!(table = name, "created relation");
        self.cache.insert(name.to_string(), table);
        Ok(())
    }

    /// Caches and returns the in-memory relation for `name`, opening it
    /// (reading its column list back from `_columns`) on first access.
    pub fn get_table(&mut self, name: &str) -> Result<&mut HeapTable<F>, CatalogError> {
        if name == "_tables" {
            return Ok(&mut self.tables);
        }
        if name == "_columns" {
            return Ok(self.columns.table_mut());
        }
        if !self.cache.contains_key(name) {
            let (column_names, column_attributes) = self.columns.for_table(name)?;
            if column_names.is_empty() {
                return Err(CatalogError::TableNotFound(name.to_string()));
            }
            let file_id = self.file_ids.next();
            let path = self.data_dir.join(format!("{name}.db"));
            self.file_catalog.add_file(file_id, path);
            let file = HeapFile::new(file_id, Arc::clone(&self.storage));
            let mut table = HeapTable::new(name, column_names, column_attributes, file);
            table.open()?;
            self.cache.insert(name.to_string(), table);
        }
        Ok(self.cache.get_mut(name).expect("just inserted"))
    }

    /// Drops the physical relation `name`: ensures it's opened (so its file
    /// is known), removes it from the cache and deletes its backing file.
    pub fn drop_relation(&mut self, name: &str) -> Result<(), CatalogError> {
        self.get_table(name)?;
        let mut table = self
            .cache
            .remove(name)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))?;
        table.drop()?;
        tracing::debug!(table = name, "dropped relation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use file::in_memory_file_manager::InMemoryFileManager;

    fn new_tables() -> Tables<InMemoryFileManager> {
        let file_catalog = Arc::new(FileCatalog::new());
        let file_manager = Arc::new(InMemoryFileManager::new(file_catalog.clone()));
        let buffer = Arc::new(buffer::buffer::BufferManager::new(file_manager.clone(), 8));
        let storage = Arc::new(StorageManager::new(file_manager, buffer));
        let file_ids = FileIdAllocator::starting_at(3);
        Tables::new(
            storage,
            file_catalog,
            PathBuf::from("data"),
            file_ids,
            1,
            2,
        )
        .unwrap()
    }

    #[test]
    fn bootstrap_registers_the_schema_tables_themselves() {
        let mut tables = new_tables();
        let rows: Vec<String> = tables
            .tables
            .select()
            .unwrap()
            .into_iter()
            .map(|h| match tables.tables.project(h).unwrap().get("table_name") {
                Some(Value::Text(name)) => name.clone(),
                _ => panic!("row missing table_name"),
            })
            .collect();
        assert!(rows.contains(&"_tables".to_string()));
        assert!(rows.contains(&"_columns".to_string()));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn register_self_row_is_idempotent() {
        let mut tables = new_tables();
        tables
            .register_self_row("_tables", &[("table_name", "TEXT")])
            .unwrap();
        let count = tables.tables.select().unwrap().len();
        assert_eq!(count, 2, "a repeated bootstrap call must not duplicate rows");
    }

    #[test]
    fn create_relation_then_get_table_round_trips_rows() {
        let mut tables = new_tables();
        tables
            .insert_table_row("widgets")
            .unwrap();
        tables
            .columns()
            .insert("widgets", "id", "INT")
            .unwrap();
        tables
            .create_relation(
                "widgets",
                vec!["id".to_string()],
                vec![ColumnAttribute::Int],
                false,
            )
            .unwrap();

        let mut row = Row::new();
        row.insert("id".to_string(), Value::Int(42));
        let handle = tables.get_table("widgets").unwrap().insert(&row).unwrap();
        let projected = tables.get_table("widgets").unwrap().project(handle).unwrap();
        assert_eq!(projected.get("id"), Some(&Value::Int(42)));
    }

    #[test]
    fn list_user_tables_excludes_schema_tables() {
        let tables = new_tables();
        assert!(tables.list_user_tables().unwrap().is_empty());
    }

    #[test]
    fn drop_relation_removes_it_from_the_cache() {
        let mut tables = new_tables();
        tables.insert_table_row("temp").unwrap();
        tables.columns().insert("temp", "a", "INT").unwrap();
        tables
            .create_relation("temp", vec!["a".to_string()], vec![ColumnAttribute::Int], false)
            .unwrap();
        tables.drop_relation("temp").unwrap();
        assert!(tables.get_table("temp").is_err());
    }
}
