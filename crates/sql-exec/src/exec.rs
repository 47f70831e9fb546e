//! `SQLExec`: turns a parsed DDL statement into catalog mutations plus
//! physical create/drop, rolling back catalog writes on partial failure
//! (spec §4.5).

use crate::ast::{ColumnDef, Statement};
use crate::errors::SqlExecError;
use crate::query_result::QueryResult;
use catalog::{Indices, Tables};
use file::api::FileManager;
use storage_api::handle::Handle;
use storage_api::value::ColumnAttribute;

/// A catalog write already performed, to be undone in reverse order if a
/// later step of the same statement fails (spec §9 "rollback composition":
/// a stack of compensating actions rather than nested catch blocks).
enum Undo {
    DeleteColumnRow(Handle),
    DeleteTableRow(Handle),
    DeleteIndexRow(Handle),
}

/// The DDL executor. Owns the two catalog singletons (spec §4.4/§9: process-
/// wide state, lazily initialized once by the caller and handed to us).
pub struct SQLExec<F: FileManager> {
    tables: Tables<F>,
    indices: Indices<F>,
}

impl<F: FileManager> SQLExec<F> {
    pub fn new(tables: Tables<F>, indices: Indices<F>) -> Self {
        Self { tables, indices }
    }

    pub fn execute(&mut self, stmt: &Statement) -> Result<QueryResult, SqlExecError> {
        match stmt {
            Statement::CreateTable {
                table_name,
                columns,
                if_not_exists,
            } => self.create_table(table_name, columns, *if_not_exists),
            Statement::CreateIndex {
                index_name,
                table_name,
                columns,
                index_type,
            } => self.create_index(index_name, table_name, columns, index_type),
            Statement::DropTable { table_name } => self.drop_table(table_name),
            Statement::DropIndex {
                index_name,
                table_name,
            } => self.drop_index(index_name, table_name),
            Statement::ShowTables => self.show_tables(),
            Statement::ShowColumns { table_name } => self.show_columns(table_name.as_deref()),
            Statement::ShowIndex { table_name } => self.show_index(table_name),
        }
    }

    fn translate_type(data_type: &str) -> Result<ColumnAttribute, SqlExecError> {
        match data_type {
            "INT" => Ok(ColumnAttribute::Int),
            "TEXT" => Ok(ColumnAttribute::Text),
            _ => Err(SqlExecError::UnsupportedColumnType),
        }
    }

    fn unwind(&mut self, actions: Vec<Undo>) {
        for action in actions.into_iter().rev() {
            let result = match action {
                Undo::DeleteColumnRow(h) => self.tables.columns().delete(h).map_err(Into::into),
                Undo::DeleteTableRow(h) => self.tables.delete_table_row(h).map_err(Into::into),
                Undo::DeleteIndexRow(h) => self.indices.delete_row(h).map_err(Into::into),
            };
            if let Err(e) = result as Result<(), SqlExecError> {
                tracing::warn!(error = %e, "rollback step failed, continuing");
            }
        }
    }

    fn create_table(
        &mut self,
        table_name: &str,
        columns: &[ColumnDef],
        if_not_exists: bool,
    ) -> Result<QueryResult, SqlExecError> {
        let attributes = columns
            .iter()
            .map(|c| Self::translate_type(&c.data_type))
            .collect::<Result<Vec<_>, _>>()?;

        let mut undo = Vec::new();
        let result = (|| -> Result<(), SqlExecError> {
            let table_handle = self.tables.insert_table_row(table_name)?;
            undo.push(Undo::DeleteTableRow(table_handle));

            for column in columns {
                let handle =
                    self.tables
                        .columns()
                        .insert(table_name, &column.name, &column.data_type)?;
                undo.push(Undo::DeleteColumnRow(handle));
            }

            let column_names = columns.iter().map(|c| c.name.clone()).collect();
            self.tables
                .create_relation(table_name, column_names, attributes, if_not_exists)?;
            Ok(())
        })();

        match result {
            Ok(()) => Ok(QueryResult::message(format!("created {table_name}"))),
            Err(e) => {
                self.unwind(undo);
                Err(e)
            }
        }
    }

    fn create_index(
        &mut self,
        index_name: &str,
        table_name: &str,
        columns: &[String],
        index_type: &str,
    ) -> Result<QueryResult, SqlExecError> {
        let (table_columns, _) = self.tables.columns().for_table(table_name)?;
        if table_columns.is_empty() {
            return Err(SqlExecError::TableNotFound(table_name.to_string()));
        }
        for column in columns {
            if !table_columns.contains(column) {
                return Err(SqlExecError::ColumnNotFound(
                    column.clone(),
                    table_name.to_string(),
                ));
            }
        }

        // Spec §9 open question: preserved exactly as written in the source.
        let is_unique = index_type == "BTREE";

        let mut undo = Vec::new();
        let result = (|| -> Result<(), SqlExecError> {
            for (i, column) in columns.iter().enumerate() {
                let handle = self.indices.insert_row(
                    table_name,
                    index_name,
                    (i + 1) as i32,
                    column,
                    index_type,
                    is_unique,
                )?;
                undo.push(Undo::DeleteIndexRow(handle));
            }
            self.indices.get_index(table_name, index_name)?.create()?;
            Ok(())
        })();

        match result {
            Ok(()) => Ok(QueryResult::message(format!("created index {index_name}"))),
            Err(e) => {
                self.unwind(undo);
                Err(e)
            }
        }
    }

    fn drop_table(&mut self, table_name: &str) -> Result<QueryResult, SqlExecError> {
        if table_name == "_tables" || table_name == "_columns" {
            return Err(SqlExecError::CannotDropSchemaTable);
        }

        let mut reinsert: Vec<(String, String, String)> = Vec::new();
        let result = (|| -> Result<Handle, SqlExecError> {
            for (handle, row) in self.indices.select(table_name, None)? {
                if let Some(storage_api::value::Value::Text(index_name)) = row.get("index_name") {
                    if let Ok(index) = self.indices.get_index(table_name, index_name) {
                        if let Err(e) = index.drop() {
                            tracing::warn!(error = %e, "failed to drop physical index storage");
                        }
                    }
                }
                self.indices.delete_row(handle)?;
            }

            for (handle, row) in self.tables.columns().select(Some(table_name))? {
                let column_name = match row.get("column_name") {
                    Some(storage_api::value::Value::Text(c)) => c.clone(),
                    _ => String::new(),
                };
                let data_type = match row.get("data_type") {
                    Some(storage_api::value::Value::Text(t)) => t.clone(),
                    _ => String::new(),
                };
                self.tables.columns().delete(handle)?;
                reinsert.push((table_name.to_string(), column_name, data_type));
            }

            self.tables.drop_relation(table_name)?;

            let handle = self
                .tables
                .list_table_handle(table_name)?
                .ok_or_else(|| SqlExecError::TableNotFound(table_name.to_string()))?;
            self.tables.delete_table_row(handle)?;
            Ok(handle)
        })();

        match result {
            Ok(_) => Ok(QueryResult::message(format!("dropped {table_name}"))),
            Err(e) => {
                for (table, column, data_type) in reinsert {
                    if let Err(reinsert_err) =
                        self.tables.columns().insert(&table, &column, &data_type)
                    {
                        tracing::warn!(error = %reinsert_err, "best-effort _columns reinsert failed");
                    }
                }
                Err(e)
            }
        }
    }

    fn drop_index(
        &mut self,
        index_name: &str,
        table_name: &str,
    ) -> Result<QueryResult, SqlExecError> {
        if table_name.is_empty() || index_name.is_empty() {
            return Err(SqlExecError::IndexNotFound);
        }

        self.indices.get_index(table_name, index_name)?.drop()?;
        self.indices.forget(table_name, index_name);

        let rows = self.indices.select(table_name, Some(index_name))?;
        if rows.is_empty() {
            return Err(SqlExecError::IndexNotFound);
        }
        for (handle, _) in rows {
            self.indices.delete_row(handle)?;
        }

        Ok(QueryResult::message(format!("dropped index {index_name}")))
    }

    fn show_tables(&mut self) -> Result<QueryResult, SqlExecError> {
        let (names, attrs) = self.tables.tables_schema();
        let names = names.to_vec();
        let attrs = attrs.to_vec();
        let rows = self.tables.list_user_tables()?;
        Ok(QueryResult::with_rows(names, attrs, rows))
    }

    fn show_columns(&mut self, table_name: Option<&str>) -> Result<QueryResult, SqlExecError> {
        let names = vec![
            "table_name".to_string(),
            "column_name".to_string(),
            "data_type".to_string(),
        ];
        // Spec §9: the source's three-header/one-attribute mismatch is fixed
        // here; the correct attribute vector is `[TEXT, TEXT, TEXT]`.
        let attrs = vec![ColumnAttribute::Text, ColumnAttribute::Text, ColumnAttribute::Text];
        let rows = self
            .tables
            .columns()
            .select(table_name)?
            .into_iter()
            .map(|(_, row)| row)
            .collect();
        Ok(QueryResult::with_rows(names, attrs, rows))
    }

    fn show_index(&mut self, table_name: &str) -> Result<QueryResult, SqlExecError> {
        let (names, attrs) = self.indices.schema();
        let names = names.to_vec();
        let attrs = attrs.to_vec();
        let rows = self
            .indices
            .select(table_name, None)?
            .into_iter()
            .map(|(_, row)| row)
            .collect();
        Ok(QueryResult::with_rows(names, attrs, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::FileIdAllocator;
    use file::file_catalog::FileCatalog;
    use file::in_memory_file_manager::InMemoryFileManager;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn new_exec() -> SQLExec<InMemoryFileManager> {
        let file_catalog = Arc::new(FileCatalog::new());
        let file_manager = Arc::new(InMemoryFileManager::new(file_catalog.clone()));
        let buffer = Arc::new(buffer::buffer::BufferManager::new(file_manager.clone(), 8));
        let storage = Arc::new(storage_api::storage_manager::StorageManager::new(
            file_manager,
            buffer,
        ));
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
        let indices = Indices::new(
            &mut tables,
            storage,
            file_catalog,
            PathBuf::from("data"),
            file_ids,
            3,
        )
        .unwrap();
        SQLExec::new(tables, indices)
    }

    fn column(name: &str, data_type: &str) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            data_type: data_type.to_string(),
        }
    }

    #[test]
    fn create_table_then_show_tables_lists_it() {
        let mut exec = new_exec();
        exec.create_table("foo", &[column("a", "INT")], false)
            .unwrap();
        let result = exec.show_tables().unwrap();
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn create_table_with_unsupported_type_leaves_no_catalog_residue() {
        let mut exec = new_exec();
        let attrs = [column("a", "DOUBLE")];
        let err = exec.create_table("foo", &attrs, false).unwrap_err();
        assert!(matches!(err, SqlExecError::UnsupportedColumnType));
        assert_eq!(exec.show_tables().unwrap().rows.len(), 0);
        assert!(exec.tables.list_table_handle("foo").unwrap().is_none());
    }

    #[test]
    fn drop_table_failure_reinserts_deleted_columns_rows() {
        let mut exec = new_exec();
        // "ghost" has column metadata but no physical relation was ever
        // created for it, so `drop_relation` fails partway through and the
        // already-deleted `_columns` row must be reinserted.
        exec.tables.insert_table_row("ghost").unwrap();
        exec.tables.columns().insert("ghost", "a", "INT").unwrap();

        let err = exec.drop_table("ghost").unwrap_err();
        assert!(matches!(err, SqlExecError::Relation(_)));
        assert_eq!(
            exec.tables.columns().select(Some("ghost")).unwrap().len(),
            1
        );
    }

    #[test]
    fn drop_table_rejects_schema_tables() {
        let mut exec = new_exec();
        assert!(matches!(
            exec.drop_table("_tables"),
            Err(SqlExecError::CannotDropSchemaTable)
        ));
        assert!(matches!(
            exec.drop_table("_columns"),
            Err(SqlExecError::CannotDropSchemaTable)
        ));
    }

    #[test]
    fn drop_table_removes_its_rows_from_every_catalog_table() {
        let mut exec = new_exec();
        exec.create_table("foo", &[column("a", "INT")], false)
            .unwrap();
        exec.drop_table("foo").unwrap();
        assert_eq!(exec.show_tables().unwrap().rows.len(), 0);
        assert!(exec
            .tables
            .columns()
            .select(Some("foo"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn create_index_then_drop_index_round_trips() {
        let mut exec = new_exec();
        exec.create_table("foo", &[column("a", "INT")], false)
            .unwrap();
        exec.create_index("fx", "foo", &["a".to_string()], "BTREE")
            .unwrap();
        assert_eq!(exec.show_index("foo").unwrap().rows.len(), 1);

        exec.drop_index("fx", "foo").unwrap();
        assert_eq!(exec.show_index("foo").unwrap().rows.len(), 0);
    }

    #[test]
    fn create_index_on_unknown_column_fails_without_writing_any_row() {
        let mut exec = new_exec();
        exec.create_table("foo", &[column("a", "INT")], false)
            .unwrap();
        let err = exec
            .create_index("fx", "foo", &["missing".to_string()], "BTREE")
            .unwrap_err();
        assert!(matches!(err, SqlExecError::ColumnNotFound(_, _)));
        assert_eq!(exec.show_index("foo").unwrap().rows.len(), 0);
    }

    #[test]
    fn drop_table_with_an_index_drops_the_index_rows_too() {
        let mut exec = new_exec();
        exec.create_table("foo", &[column("a", "INT")], false)
            .unwrap();
        exec.create_index("fx", "foo", &["a".to_string()], "BTREE")
            .unwrap();
        exec.drop_table("foo").unwrap();
        assert_eq!(exec.show_index("foo").unwrap().rows.len(), 0);
    }
}
