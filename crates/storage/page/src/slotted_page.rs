//! The slotted-page block layout: a fixed-size block holding a growing
//! header-slot directory at the low end and variable-length record payloads
//! packed against the high end, separated by free space in the middle.

use crate::block_id::BlockId;
use crate::errors::delete_error::DeleteError;
use crate::errors::insert_error::InsertError;
use crate::errors::page_error::{PageResult, WithBlockId};
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use crate::header::{HeaderMut, HeaderRef};
use crate::record_id::RecordId;
use crate::slot::{slot_offset, SlotMut, SlotRef, SLOT_SIZE};

/// Fixed size, in bytes, of every block persisted by the storage layer.
pub const BLOCK_SZ: usize = 4096;

/// One in-memory block interpreted under the slotted-page layout.
#[derive(Debug, Clone)]
pub struct Page {
    block_id: BlockId,
    buffer: Box<[u8; BLOCK_SZ]>,
}

impl Page {
    /// Builds a brand-new, empty page: zero records, all of the block free.
    pub fn new_empty(block_id: BlockId) -> Self {
        let mut buffer = Box::new([0u8; BLOCK_SZ]);
        // slot 0 is the header: (num_records = 0, end_free = BLOCK_SZ - 1)
        HeaderMut::new(&mut buffer[0..SLOT_SIZE])
            .expect("header slot is exactly SLOT_SIZE bytes")
            .set(0, (BLOCK_SZ - 1) as u16)
            .expect("header slot is exactly SLOT_SIZE bytes");
        Self { block_id, buffer }
    }

    /// An all-zero placeholder page, used by the buffer manager to populate a
    /// frame before the real bytes are read in from disk.
    pub fn zeroed(block_id: BlockId) -> Self {
        Self {
            block_id,
            buffer: Box::new([0u8; BLOCK_SZ]),
        }
    }

    /// The block this page occupies.
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// Reassigns which block this in-memory page represents, used by the
    /// buffer manager once it knows which block was loaded into a frame.
    pub fn set_block_id(&mut self, block_id: BlockId) {
        self.block_id = block_id;
    }

    /// The raw bytes of this page, ready to hand to the file layer.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SZ] {
        &self.buffer
    }

    /// Mutable access to the raw bytes, used by the buffer manager to read a
    /// block's contents in from disk directly into the frame.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut_slice()
    }

    fn header(&self) -> HeaderRef<'_> {
        HeaderRef::new(&self.buffer[0..SLOT_SIZE]).expect("header slot is exactly SLOT_SIZE bytes")
    }

    fn header_mut(&mut self) -> HeaderMut<'_> {
        HeaderMut::new(&mut self.buffer[0..SLOT_SIZE])
            .expect("header slot is exactly SLOT_SIZE bytes")
    }

    fn num_records(&self) -> u16 {
        self.header().num_records().expect("header is always valid")
    }

    fn end_free(&self) -> u16 {
        self.header().end_free().expect("header is always valid")
    }

    fn slot(&self, record_id: RecordId) -> Result<(u16, u16), SlotError> {
        if record_id.as_u16() == 0 || record_id.as_u16() > self.num_records() {
            return Err(SlotError::InvalidRecordId {
                record_id: record_id.as_u16(),
            });
        }
        let offset = slot_offset(record_id.as_u16());
        let view = SlotRef::new(&self.buffer[offset..offset + SLOT_SIZE])?;
        Ok((view.first()?, view.second()?))
    }

    fn set_slot(&mut self, record_id: RecordId, size: u16, loc: u16) -> Result<(), SlotError> {
        let offset = slot_offset(record_id.as_u16());
        let mut view = SlotMut::new(&mut self.buffer[offset..offset + SLOT_SIZE])?;
        view.set(size, loc)?;
        Ok(())
    }

    /// Free bytes available for a new payload, per the page's literal invariant:
    /// `end_free - 4 * (num_records + 1)`. Does not additionally reserve room
    /// for the new slot entry a subsequent `add` would need; this mirrors the
    /// source algorithm exactly.
    pub fn available(&self) -> u16 {
        let reserved = SLOT_SIZE as u16 * (self.num_records() + 1);
        self.end_free().saturating_sub(reserved)
    }

    /// Whether a payload of `size` bytes currently fits.
    pub fn has_room(&self, size: usize) -> bool {
        match u16::try_from(size) {
            Ok(size) => size <= self.available(),
            Err(_) => false,
        }
    }

    /// Appends `data` as a new record, returning its freshly assigned id.
    /// Ids are never reused, even for slots vacated by `del`.
    pub fn add(&mut self, data: &[u8]) -> PageResult<RecordId> {
        self.try_add(data).with_block_id(self.block_id)
    }

    fn try_add(&mut self, data: &[u8]) -> Result<RecordId, InsertError> {
        if !self.has_room(data.len()) {
            return Err(InsertError::NotEnoughSpace {
                record_len: data.len(),
                available: self.available() as usize,
            });
        }
        let size = data.len() as u16;
        let end_free = self.end_free();
        let loc = end_free - size + 1;
        let loc_usize = loc as usize;
        self.buffer[loc_usize..loc_usize + data.len()].copy_from_slice(data);

        let new_id = RecordId::new(self.num_records() + 1);
        self.set_slot(new_id, size, loc)?;
        self.header_mut().set(new_id.as_u16(), loc - 1)?;
        Ok(new_id)
    }

    /// Returns the payload last written for `record_id`, or `None` if it was
    /// tombstoned (deleted) or never allocated.
    pub fn get(&self, record_id: RecordId) -> PageResult<Option<&[u8]>> {
        self.try_get(record_id).with_block_id(self.block_id)
    }

    fn try_get(&self, record_id: RecordId) -> Result<Option<&[u8]>, SlotError> {
        let (size, loc) = self.slot(record_id)?;
        if loc == 0 {
            return Ok(None);
        }
        let loc = loc as usize;
        Ok(Some(&self.buffer[loc..loc + size as usize]))
    }

    /// Every non-tombstoned record id, in ascending id order.
    pub fn ids(&self) -> PageResult<Vec<RecordId>> {
        self.try_ids().with_block_id(self.block_id)
    }

    fn try_ids(&self) -> Result<Vec<RecordId>, SlotError> {
        let mut out = Vec::new();
        for raw in 1..=self.num_records() {
            let record_id = RecordId::new(raw);
            let (_, loc) = self.slot(record_id)?;
            if loc != 0 {
                out.push(record_id);
            }
        }
        Ok(out)
    }

    /// Rewrites the payload of `record_id` in place, growing or shrinking the
    /// record and sliding surrounding records to keep the data region packed.
    pub fn put(&mut self, record_id: RecordId, data: &[u8]) -> PageResult<()> {
        self.try_put(record_id, data).with_block_id(self.block_id)
    }

    fn try_put(&mut self, record_id: RecordId, data: &[u8]) -> Result<(), UpdateError> {
        let (old_size, loc) = self.slot(record_id)?;
        let new_size = data.len() as u16;

        if new_size <= old_size {
            let loc_usize = loc as usize;
            self.buffer[loc_usize..loc_usize + data.len()].copy_from_slice(data);
            self.slide(loc + new_size, loc + old_size);
        } else {
            let extra = new_size - old_size;
            if !self.has_room(extra as usize) {
                return Err(UpdateError::NotEnoughSpace {
                    extra: extra as usize,
                    available: self.available() as usize,
                });
            }
            self.slide(loc, loc - extra);
            let new_loc = (loc - extra) as usize;
            self.buffer[new_loc..new_loc + data.len()].copy_from_slice(data);
        }

        let (_, final_loc) = self.slot(record_id)?;
        self.set_slot(record_id, new_size, final_loc)?;
        Ok(())
    }

    /// Tombstones `record_id`, freeing its payload bytes via the same sliding
    /// compaction `put` uses for a shrink to zero length.
    pub fn del(&mut self, record_id: RecordId) -> PageResult<()> {
        self.try_del(record_id).with_block_id(self.block_id)
    }

    fn try_del(&mut self, record_id: RecordId) -> Result<(), DeleteError> {
        let (size, loc) = self.slot(record_id)?;
        if loc == 0 {
            return Ok(());
        }
        self.slide(loc, loc + size);
        self.set_slot(record_id, 0, 0)?;
        Ok(())
    }

    /// Moves the live byte range `[end_free+1, start)` to
    /// `[end_free+1+shift, start+shift)` where `shift = end - start`, then
    /// rewrites every slot whose `loc <= start` by `shift`, and finally
    /// advances `end_free` by `shift`. A shift of zero is a no-op.
    fn slide(&mut self, start: u16, end: u16) {
        let shift = end as i32 - start as i32;
        if shift == 0 {
            return;
        }

        let end_free = self.end_free();
        let range_start = end_free as usize + 1;
        let range_end = start as usize;
        if range_start < range_end {
            let dest_start = (range_start as i32 + shift) as usize;
            self.buffer.copy_within(range_start..range_end, dest_start);
        }

        for raw in 1..=self.num_records() {
            let record_id = RecordId::new(raw);
            let (size, loc) = self.slot(record_id).expect("record id within range");
            if loc != 0 && loc <= start {
                let new_loc = (loc as i32 + shift) as u16;
                self.set_slot(record_id, size, new_loc)
                    .expect("slot write within bounds");
            }
        }

        let new_end_free = (end_free as i32 + shift) as u16;
        let num_records = self.num_records();
        self.header_mut()
            .set(num_records, new_end_free)
            .expect("header slot is exactly SLOT_SIZE bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new_empty(BlockId::new(1))
    }

    #[test]
    fn add_then_get_returns_written_bytes() {
        let mut p = page();
        let id = p.add(b"hello").unwrap();
        assert_eq!(p.get(id).unwrap(), Some(&b"hello"[..]));
    }

    #[test]
    fn ids_never_reused_after_delete() {
        let mut p = page();
        let a = p.add(b"aaa").unwrap();
        p.del(a).unwrap();
        let b = p.add(b"bbbbb").unwrap();
        assert!(b.as_u16() > a.as_u16());
        assert_eq!(p.get(a).unwrap(), None);
        assert_eq!(p.get(b).unwrap(), Some(&b"bbbbb"[..]));
    }

    #[test]
    fn del_tombstones_and_ids_excludes_it() {
        let mut p = page();
        let a = p.add(b"aaa").unwrap();
        let b = p.add(b"bb").unwrap();
        p.del(a).unwrap();
        assert_eq!(p.ids().unwrap(), vec![b]);
        assert_eq!(p.get(a).unwrap(), None);
        assert_eq!(p.get(b).unwrap(), Some(&b"bb"[..]));
    }

    #[test]
    fn put_shrink_preserves_other_records() {
        let mut p = page();
        let a = p.add(b"aaaaaaaaaa").unwrap();
        let b = p.add(b"bb").unwrap();
        p.put(a, b"a").unwrap();
        assert_eq!(p.get(a).unwrap(), Some(&b"a"[..]));
        assert_eq!(p.get(b).unwrap(), Some(&b"bb"[..]));
    }

    #[test]
    fn put_grow_preserves_other_records() {
        let mut p = page();
        let a = p.add(b"a").unwrap();
        let b = p.add(b"bb").unwrap();
        p.put(a, b"aaaaaaaaaa").unwrap();
        assert_eq!(p.get(a).unwrap(), Some(&b"aaaaaaaaaa"[..]));
        assert_eq!(p.get(b).unwrap(), Some(&b"bb"[..]));
    }

    #[test]
    fn add_fails_with_no_room_past_capacity() {
        let mut p = page();
        let big = vec![0u8; BLOCK_SZ];
        assert!(p.add(&big).is_err());
    }

    #[test]
    fn header_never_overlaps_data_region() {
        let mut p = page();
        for i in 0..20u8 {
            p.add(&[i; 10]).unwrap();
        }
        let header_end = SLOT_SIZE as u16 * (p.num_records() + 1);
        assert!(header_end <= p.end_free() + 1);
    }

    #[test]
    fn slide_noop_when_start_equals_end() {
        let mut p = page();
        p.add(b"aaa").unwrap();
        let before = p.buffer.clone();
        p.slide(10, 10);
        assert_eq!(p.buffer, before);
    }
}
