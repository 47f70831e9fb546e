//! The `_columns` schema relation: `{ table_name: TEXT, column_name: TEXT,
//! data_type: TEXT }`, one row per (table, column) (spec §4.4).

use crate::errors::CatalogError;
use file::api::FileManager;
use storage_api::handle::Handle;
use storage_api::heap_file::HeapFile;
use storage_api::heap_table::HeapTable;
use storage_api::value::{ColumnAttribute, Row, Value};

/// Plain `HeapTable` wrapper typed to the `_columns` schema.
pub struct Columns<F: FileManager> {
    table: HeapTable<F>,
}

impl<F: FileManager> Columns<F> {
    pub(crate) fn open(file: HeapFile<F>) -> Result<Self, CatalogError> {
        let mut table = HeapTable::new(
            "_columns",
            vec![
                "table_name".to_string(),
                "column_name".to_string(),
                "data_type".to_string(),
            ],
            vec![
                ColumnAttribute::Text,
                ColumnAttribute::Text,
                ColumnAttribute::Text,
            ],
            file,
        );
        table.create_if_not_exists()?;
        Ok(Self { table })
    }

    /// The underlying `_columns` relation, used by `Tables::get_table` to
    /// special-case lookups of the schema table itself rather than opening a
    /// second, divergent handle onto the same backing file.
    pub fn table_mut(&mut self) -> &mut HeapTable<F> {
        &mut self.table
    }

    pub fn schema(&self) -> (&[String], &[ColumnAttribute]) {
        (self.table.column_names(), self.table.column_attributes())
    }

    pub fn insert(
        &mut self,
        table_name: &str,
        column_name: &str,
        data_type: &str,
    ) -> Result<Handle, CatalogError> {
        let mut row = Row::new();
        row.insert("table_name".to_string(), Value::Text(table_name.to_string()));
        row.insert(
            "column_name".to_string(),
            Value::Text(column_name.to_string()),
        );
        row.insert("data_type".to_string(), Value::Text(data_type.to_string()));
        Ok(self.table.insert(&row)?)
    }

    pub fn delete(&mut self, handle: Handle) -> Result<(), CatalogError> {
        Ok(self.table.delete(handle)?)
    }

    /// Every `_columns` row, optionally filtered to one table.
    pub fn select(&self, table_name: Option<&str>) -> Result<Vec<(Handle, Row)>, CatalogError> {
        let mut rows = Vec::new();
        for handle in self.table.select()? {
            let row = self.table.project(handle)?;
            if let Some(filter) = table_name {
                match row.get("table_name") {
                    Some(Value::Text(name)) if name == filter => {}
                    _ => continue,
                }
            }
            rows.push((handle, row));
        }
        Ok(rows)
    }

    /// Columns declared for `table_name`, in the order `_columns` rows were
    /// inserted (insertion order is sufficient per spec §4.4).
    pub fn for_table(
        &self,
        table_name: &str,
    ) -> Result<(Vec<String>, Vec<ColumnAttribute>), CatalogError> {
        let mut names = Vec::new();
        let mut attrs = Vec::new();
        for (_, row) in self.select(Some(table_name))? {
            if let Some(Value::Text(name)) = row.get("column_name") {
                names.push(name.clone());
            }
            if let Some(Value::Text(data_type)) = row.get("data_type") {
                attrs.push(match data_type.as_str() {
                    "INT" => ColumnAttribute::Int,
                    "TEXT" => ColumnAttribute::Text,
                    other => return Err(CatalogError::UnknownDataType(other.to_string())),
                });
            }
        }
        Ok((names, attrs))
    }
}
