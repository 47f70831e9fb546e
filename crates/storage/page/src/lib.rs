//! Binary layout and in-place mutation algorithms for the slotted-page block
//! format: the unit both the heap file and the buffer manager operate on.

pub mod block_id;
pub mod errors;
pub mod header;
pub mod page_id;
pub mod record_id;
pub mod slot;
pub mod slotted_page;

pub use block_id::BlockId;
pub use record_id::RecordId;
pub use slotted_page::{Page, BLOCK_SZ};

/// Alias kept for the cross-file addressing consumers (`file`, `buffer`)
/// that size their I/O buffers against this constant.
pub const PAGE_SIZE: usize = BLOCK_SZ;
