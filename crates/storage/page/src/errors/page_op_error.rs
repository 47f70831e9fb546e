use crate::errors::delete_error::DeleteError;
use crate::errors::header_error::HeaderError;
use crate::errors::insert_error::InsertError;
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use thiserror::Error;

/// Aggregator error type for all possible page-related sub-errors.
#[derive(Debug, Error)]
pub(crate) enum PageOpError {
    #[error("error while accessing the header")]
    Header(#[from] HeaderError),
    #[error("error while accessing a slot")]
    Slot(#[from] SlotError),
    #[error("error while inserting a record")]
    Insert(#[from] InsertError),
    #[error("error while updating a record")]
    Update(#[from] UpdateError),
    #[error("error while deleting a record")]
    Delete(#[from] DeleteError),
}

impl PageOpError {
    pub(crate) fn is_out_of_space(&self) -> bool {
        matches!(
            self,
            PageOpError::Insert(InsertError::NotEnoughSpace { .. })
                | PageOpError::Update(UpdateError::NotEnoughSpace { .. })
        )
    }
}
