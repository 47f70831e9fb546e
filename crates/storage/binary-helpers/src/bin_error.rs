use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors raised while reading or writing fixed-width integers from/to raw byte slices.
#[derive(Error, Debug)]
pub enum BinaryError {
    #[error(
        "attempt to read {expected} bytes starting at offset {from_offset}, but the slice does not contain that range"
    )]
    ReadErrorInvalidSliceSize {
        expected: usize,
        from_offset: usize,
    },
    #[error("error converting a slice to a fixed-size array")]
    SliceConversionError(#[from] TryFromSliceError),
    #[error("error writing data due to size mismatch: source {src} bytes vs target {target} bytes")]
    WriteErrorSliceSizeMismatch { src: usize, target: usize },
}
