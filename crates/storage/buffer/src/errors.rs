use page::page_id::PageId;
use thiserror::Error;

/// Buffer error.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Buffer was full
    #[error("buffer is full")]
    BufferFull,
    /// Could not read file from disk
    #[error("could not read page {0} from disk")]
    IoReadFailed(PageId),
    /// Could not write page back to disk
    #[error("could not write page {0} back to disk")]
    IoWriteFailed(PageId),
    /// Tried to flush a page that was never loaded into the buffer
    #[error("tried to flush page {0} that was never loaded into the buffer")]
    NotLoaded(PageId),
}
