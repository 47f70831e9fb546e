use page::page_id::FileId;
use thiserror::Error;

/// Errors raised by a `FileManager` implementation.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error accessing file {file_id}")]
    Io {
        file_id: FileId,
        #[source]
        source: std::io::Error,
    },
    #[error("file {file_id} already exists")]
    AlreadyExists { file_id: FileId },
    #[error("file {file_id} not found")]
    NotFound { file_id: FileId },
}
