//! # TRDB
//!
//! The storage and catalog core of a small relational database engine (spec
//! §1): a slotted-page block store, a heap file/table relation abstraction,
//! a schema catalog, and a DDL executor, wired together behind an
//! interactive REPL shell.
//!
//! The engine is composed of small, single-purpose crates under `/crates`:
//! - `crates/storage`: binary layout, page cache and on-disk file access.
//! - `crates/catalog`: `_tables`/`_columns`/`_indices` and their bootstrap.
//! - `crates/sql-exec`: the `SQLExec` DDL executor and `QueryResult`.

pub mod config;
pub mod engine_environment;
pub mod parser;

pub use config::EngineConfig;
pub use engine_environment::EngineEnvironment;
