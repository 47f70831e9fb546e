use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum HeaderError {
    #[error("error reading page header")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("error reading page header")]
    SlotError(#[from] SlotError),
}
