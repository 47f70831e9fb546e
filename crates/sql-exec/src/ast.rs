//! The statement shape `SQLExec::execute` consumes (spec §6 "Parser
//! interface (consumed)"). The parser itself is out of scope; this is its
//! contract.

/// A parsed column definition, before `ColumnAttribute` translation — the
/// parser may hand back types this repo doesn't support (e.g. `DOUBLE`),
/// which `SQLExec` rejects at CREATE TABLE time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable {
        table_name: String,
        columns: Vec<ColumnDef>,
        if_not_exists: bool,
    },
    CreateIndex {
        index_name: String,
        table_name: String,
        columns: Vec<String>,
        index_type: String,
    },
    DropTable {
        table_name: String,
    },
    DropIndex {
        index_name: String,
        table_name: String,
    },
    ShowTables,
    ShowColumns {
        table_name: Option<String>,
    },
    ShowIndex {
        table_name: String,
    },
}
