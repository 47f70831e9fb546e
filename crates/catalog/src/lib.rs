//! The schema catalog (spec §4.4): `_tables`, `_columns` and `_indices`,
//! three distinguished `HeapTable`s that describe every user relation and
//! index and bootstrap themselves on first use.

pub mod columns;
pub mod errors;
pub mod index;
pub mod indices;
pub mod tables;

pub use columns::Columns;
pub use index::HeapIndex;
pub use indices::Indices;
pub use tables::Tables;

use page::page_id::FileId;
use std::sync::{Arc, Mutex};

/// Hands out the monotonically-increasing `FileId`s the catalog assigns to
/// every relation (schema or user) and index it opens for the first time.
#[derive(Debug, Clone)]
pub struct FileIdAllocator {
    next: Arc<Mutex<FileId>>,
}

impl FileIdAllocator {
    /// Creates an allocator whose first `next()` call returns `first`.
    pub fn starting_at(first: FileId) -> Self {
        Self {
            next: Arc::new(Mutex::new(first)),
        }
    }

    /// Returns the next unused `FileId`.
    pub fn next(&self) -> FileId {
        let mut guard = self.next.lock().unwrap();
        let id = *guard;
        *guard += 1;
        id
    }
}
