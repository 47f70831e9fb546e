use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InsertError {
    #[error("unable to insert a record of {record_len} bytes into a page with {available} bytes available")]
    NotEnoughSpace { record_len: usize, available: usize },
    #[error("error while accessing a slot")]
    SlotError(#[from] SlotError),
    #[error("error while accessing the header")]
    HeaderError(#[from] HeaderError),
}
