//! The page header: slot 0 of a block, holding `(num_records, end_free)`.

use crate::errors::header_error::HeaderError;
use crate::slot::{SlotMut, SlotRef};

/// Read-only view of the page header.
pub struct HeaderRef<'a> {
    slot: SlotRef<'a>,
}

impl<'a> HeaderRef<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Result<Self, HeaderError> {
        Ok(Self {
            slot: SlotRef::new(bytes)?,
        })
    }

    /// Number of record slots currently allocated on this page (tombstones included).
    pub fn num_records(&self) -> Result<u16, HeaderError> {
        Ok(self.slot.first()?)
    }

    /// Byte offset of the byte just before the lowest-addressed live payload.
    pub fn end_free(&self) -> Result<u16, HeaderError> {
        Ok(self.slot.second()?)
    }
}

/// Mutable view of the page header.
pub struct HeaderMut<'a> {
    slot: SlotMut<'a>,
}

impl<'a> HeaderMut<'a> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Result<Self, HeaderError> {
        Ok(Self {
            slot: SlotMut::new(bytes)?,
        })
    }

    /// Number of record slots currently allocated on this page.
    pub fn num_records(&self) -> Result<u16, HeaderError> {
        Ok(self.slot.first()?)
    }

    /// Byte offset of the byte just before the lowest-addressed live payload.
    pub fn end_free(&self) -> Result<u16, HeaderError> {
        Ok(self.slot.second()?)
    }

    /// Overwrites both header fields.
    pub fn set(&mut self, num_records: u16, end_free: u16) -> Result<(), HeaderError> {
        Ok(self.slot.set(num_records, end_free)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_header_round_trips() {
        let mut buf = [0u8; 4];
        HeaderMut::new(&mut buf).unwrap().set(0, 4095).unwrap();
        let header = HeaderRef::new(&buf).unwrap();
        assert_eq!(header.num_records().unwrap(), 0);
        assert_eq!(header.end_free().unwrap(), 4095);
    }
}
