use crate::block_id::BlockId;
use crate::errors::page_op_error::PageOpError;

/// Public-facing error type returned by the page module.
#[derive(Debug, thiserror::Error)]
#[error("error on block {block_id}: {source}")]
pub struct PageError {
    /// The block on which the error occurred.
    pub(crate) block_id: BlockId,
    /// The underlying cause.
    pub(crate) source: PageOpError,
}

/// Public-facing result type of page operations.
pub type PageResult<T> = Result<T, PageError>;

impl PageError {
    /// The block the failing operation targeted.
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// Whether this error represents the page having no room for the
    /// attempted payload, as opposed to a structural/corruption error.
    pub fn is_out_of_space(&self) -> bool {
        self.source.is_out_of_space()
    }
}

/// Helper trait to attach `BlockId` context when surfacing errors.
pub(crate) trait WithBlockId<T> {
    fn with_block_id(self, block_id: BlockId) -> PageResult<T>;
}

impl<T, E> WithBlockId<T> for Result<T, E>
where
    E: Into<PageOpError>,
{
    fn with_block_id(self, block_id: BlockId) -> PageResult<T> {
        self.map_err(|source| PageError {
            block_id,
            source: source.into(),
        })
    }
}
