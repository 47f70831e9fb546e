use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum UpdateError {
    #[error("unable to grow a record by {extra} bytes with only {available} bytes available")]
    NotEnoughSpace { extra: usize, available: usize },
    #[error("error while accessing a slot")]
    SlotError(#[from] SlotError),
    #[error("error while accessing the header")]
    HeaderError(#[from] HeaderError),
}
