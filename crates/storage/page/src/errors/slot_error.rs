use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SlotError {
    #[error(
        "attempted to read a slot from an invalid slice size: expected {expected_size}, got {actual_size}"
    )]
    SlotSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },
    #[error("attempted to access an invalid record id: {record_id}")]
    InvalidRecordId { record_id: u16 },
    #[error("error while interpreting binary data")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
}
