//! A typed relation (`DbRelation`) built on one `HeapFile` (spec §4.3).

use crate::errors::{HeapFileError, HeapTableError};
use crate::handle::Handle;
use crate::heap_file::HeapFile;
use crate::row::{marshal, unmarshal};
use crate::value::{ColumnAttribute, Row};
use file::api::FileManager;

/// A named, column-typed table whose rows are marshaled onto one `HeapFile`.
pub struct HeapTable<F: FileManager> {
    name: String,
    column_names: Vec<String>,
    column_attributes: Vec<ColumnAttribute>,
    file: HeapFile<F>,
}

impl<F: FileManager> HeapTable<F> {
    pub fn new(
        name: impl Into<String>,
        column_names: Vec<String>,
        column_attributes: Vec<ColumnAttribute>,
        file: HeapFile<F>,
    ) -> Self {
        Self {
            name: name.into(),
            column_names,
            column_attributes,
            file,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_attributes(&self) -> &[ColumnAttribute] {
        &self.column_attributes
    }

    pub fn create(&mut self) -> Result<(), HeapTableError> {
        self.file.create().map_err(Into::into)
    }

    pub fn create_if_not_exists(&mut self) -> Result<(), HeapTableError> {
        self.file.create_if_not_exists().map_err(Into::into)
    }

    pub fn drop(&mut self) -> Result<(), HeapTableError> {
        self.file.drop().map_err(Into::into)
    }

    pub fn open(&mut self) -> Result<(), HeapTableError> {
        self.file.open().map_err(Into::into)
    }

    pub fn close(&mut self) {
        self.file.close();
    }

    /// Validates `row` carries a value for every declared column, then
    /// appends its marshaled bytes to the last block, falling back to a
    /// freshly allocated block when the last one has no room.
    pub fn insert(&mut self, row: &Row) -> Result<Handle, HeapTableError> {
        self.open()?;
        for column in &self.column_names {
            if !row.contains_key(column) {
                return Err(HeapTableError::Null {
                    column: column.clone(),
                });
            }
        }
        let bytes = marshal(row, &self.column_names, &self.column_attributes)?;
        self.append(&bytes)
    }

    /// Appends `bytes` as a new record, returning the handle of the block
    /// and record id actually used to hold it — even when the last block was
    /// full and a fresh block had to be allocated (spec §4.3/§9: the source's
    /// variable-shadowing bug must not resurface here).
    fn append(&mut self, bytes: &[u8]) -> Result<Handle, HeapTableError> {
        let block_ids = self.file.block_ids();
        let last_block_id = *block_ids
            .last()
            .expect("a created heap file always has at least block 1");
        let mut block = self.file.get(last_block_id)?;

        let (block, record_id) = match block.add(bytes) {
            Ok(record_id) => (block, record_id),
            Err(e) if e.is_out_of_space() => {
                let mut new_block = self.file.get_new()?;
                match new_block.add(bytes) {
                    Ok(record_id) => (new_block, record_id),
                    Err(e) if e.is_out_of_space() => {
                        return Err(HeapTableError::RowTooWide { size: bytes.len() });
                    }
                    Err(e) => return Err(HeapTableError::HeapFile(HeapFileError::Page(e))),
                }
            }
            Err(e) => return Err(HeapTableError::HeapFile(HeapFileError::Page(e))),
        };

        self.file.put(&block)?;
        Ok(Handle::new(block.block_id(), record_id))
    }

    /// Every non-tombstoned record across every block, as handles.
    pub fn select(&self) -> Result<Vec<Handle>, HeapTableError> {
        let mut handles = Vec::new();
        for block_id in self.file.block_ids() {
            let block = self.file.get(block_id)?;
            for record_id in block.ids().map_err(|e| HeapTableError::HeapFile(e.into()))? {
                handles.push(Handle::new(block_id, record_id));
            }
        }
        Ok(handles)
    }

    /// Tombstones the record referenced by `handle`. `update` is left
    /// unimplemented, per spec §4.3 ("unspecified in the core"); `del` is
    /// implemented because the catalog's DDL rollback (spec §4.5) deletes
    /// rows by handle.
    pub fn delete(&mut self, handle: Handle) -> Result<(), HeapTableError> {
        let mut block = self.file.get(handle.block_id)?;
        block
            .del(handle.record_id)
            .map_err(|e| HeapTableError::HeapFile(HeapFileError::Page(e)))?;
        self.file.put(&block)?;
        Ok(())
    }

    /// The full row referenced by `handle`.
    pub fn project(&self, handle: Handle) -> Result<Row, HeapTableError> {
        self.project_columns(handle, &[])
    }

    /// The named columns of the row referenced by `handle`; an empty
    /// `column_names` behaves like a full projection.
    pub fn project_columns(
        &self,
        handle: Handle,
        column_names: &[String],
    ) -> Result<Row, HeapTableError> {
        let block = self.file.get(handle.block_id)?;
        let bytes = block
            .get(handle.record_id)
            .map_err(|e| HeapTableError::HeapFile(e.into()))?
            .ok_or_else(|| HeapTableError::Null {
                column: "<tombstoned handle>".to_string(),
            })?;
        let row = unmarshal(bytes, &self.column_names, &self.column_attributes)?;

        if column_names.is_empty() {
            return Ok(row);
        }
        let mut projected = Row::new();
        for name in column_names {
            if let Some(value) = row.get(name) {
                projected.insert(name.clone(), value.clone());
            }
        }
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_manager::StorageManager;
    use crate::value::Value;
    use file::file_catalog::FileCatalog;
    use file::in_memory_file_manager::InMemoryFileManager;
    use std::sync::Arc;

    fn new_table(name: &str, file_id: u32) -> HeapTable<InMemoryFileManager> {
        let file_catalog = Arc::new(FileCatalog::new());
        file_catalog.add_file(file_id, std::path::PathBuf::from(format!("{name}.db")));
        let file_manager = Arc::new(InMemoryFileManager::new(file_catalog.clone()));
        let buffer = Arc::new(buffer::buffer::BufferManager::new(file_manager.clone(), 8));
        let storage = Arc::new(StorageManager::new(file_manager, buffer));
        let file = HeapFile::new(file_id, storage);
        let mut table = HeapTable::new(
            name,
            vec!["a".to_string(), "b".to_string()],
            vec![ColumnAttribute::Int, ColumnAttribute::Text],
            file,
        );
        table.create().unwrap();
        table
    }

    fn row(a: i32, b: &str) -> Row {
        let mut row = Row::new();
        row.insert("a".to_string(), Value::Int(a));
        row.insert("b".to_string(), Value::Text(b.to_string()));
        row
    }

    #[test]
    fn insert_then_project_round_trips() {
        let mut table = new_table("t1", 1);
        let handle = table.insert(&row(7, "seven")).unwrap();
        let projected = table.project(handle).unwrap();
        assert_eq!(projected, row(7, "seven"));
    }

    #[test]
    fn insert_rejects_missing_column() {
        let mut table = new_table("t2", 2);
        let mut incomplete = Row::new();
        incomplete.insert("a".to_string(), Value::Int(1));
        assert!(matches!(
            table.insert(&incomplete),
            Err(HeapTableError::Null { column }) if column == "b"
        ));
    }

    #[test]
    fn select_round_trips_enough_rows_to_span_multiple_blocks() {
        let mut table = new_table("t3", 3);
        let total = 500;
        for i in 0..total {
            table
                .insert(&row(i, "padding-value-for-slots"))
                .unwrap();
        }
        let handles = table.select().unwrap();
        assert_eq!(handles.len(), total as usize);
        let values: Vec<i32> = handles
            .into_iter()
            .map(|h| match table.project(h).unwrap().get("a") {
                Some(Value::Int(n)) => *n,
                other => panic!("unexpected value: {other:?}"),
            })
            .collect();
        assert_eq!(values, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn delete_tombstones_the_record() {
        let mut table = new_table("t4", 4);
        let handle = table.insert(&row(1, "one")).unwrap();
        table.delete(handle).unwrap();
        assert!(table.project(handle).is_err());
    }

    #[test]
    fn project_columns_filters_to_requested_names() {
        let mut table = new_table("t5", 5);
        let handle = table.insert(&row(3, "three")).unwrap();
        let projected = table
            .project_columns(handle, &["b".to_string()])
            .unwrap();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("b"), Some(&Value::Text("three".to_string())));
    }
}
