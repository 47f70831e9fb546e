//! The DDL executor (spec §4.5): turns a consumed parser AST into catalog
//! mutations and physical create/drop, with rollback on partial failure.

pub mod ast;
pub mod errors;
pub mod exec;
pub mod query_result;

pub use ast::Statement;
pub use errors::SqlExecError;
pub use exec::SQLExec;
pub use query_result::QueryResult;
