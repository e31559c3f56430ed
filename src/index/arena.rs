//! Flat record storage for the exact index.
//!
//! Slot `i` occupies bytes `[i * stride, (i + 1) * stride)`: the encoded
//! vector payload followed by its little-endian label. All size arithmetic
//! is checked once, when the arena is allocated; slot accessors rely on that
//! and only index within the allocation.

use crate::error::{KnnError, Result};
use crate::metrics::ResourceLimits;
use crate::types::{Label, Slot};

pub(crate) struct Arena {
    bytes: Vec<u8>,
    capacity: usize,
    data_size: usize,
    stride: usize,
}

impl Arena {
    /// Bytes per record for a payload of `data_size` bytes.
    pub(crate) fn stride_for(data_size: usize) -> usize {
        data_size + Label::SIZE
    }

    /// Total arena bytes for `capacity` records, or `None` on overflow.
    pub(crate) fn bytes_for(capacity: usize, data_size: usize) -> Option<usize> {
        capacity.checked_mul(Self::stride_for(data_size))
    }

    /// Allocate a zero-filled arena for `capacity` records, refusing sizes
    /// that exceed `limits` before any memory is reserved.
    pub(crate) fn allocate_within(
        limits: &ResourceLimits,
        capacity: usize,
        data_size: usize,
    ) -> Result<Self> {
        let bytes = Self::bytes_for(capacity, data_size)
            .ok_or_else(|| KnnError::allocation_failed(usize::MAX))?;
        limits.check_arena(capacity, bytes)?;
        Self::allocate(capacity, data_size)
    }

    /// Allocate a zero-filled arena for `capacity` records.
    fn allocate(capacity: usize, data_size: usize) -> Result<Self> {
        let total = Self::bytes_for(capacity, data_size)
            .ok_or_else(|| KnnError::allocation_failed(usize::MAX))?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(total)
            .map_err(|_| KnnError::allocation_failed(total))?;
        bytes.resize(total, 0);

        Ok(Self {
            bytes,
            capacity,
            data_size,
            stride: Self::stride_for(data_size),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    /// Every byte of the arena, including unused slots.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view of every byte, used when reading a saved arena.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    #[inline]
    fn offset(&self, slot: Slot) -> usize {
        debug_assert!(slot.0 < self.capacity, "slot {} out of range", slot.0);
        slot.0 * self.stride
    }

    /// Vector payload stored at `slot`.
    #[inline]
    pub(crate) fn payload(&self, slot: Slot) -> &[u8] {
        let start = self.offset(slot);
        &self.bytes[start..start + self.data_size]
    }

    /// Label stored after the payload at `slot`.
    #[inline]
    pub(crate) fn label(&self, slot: Slot) -> Label {
        let start = self.offset(slot) + self.data_size;
        Label::from_le_slice(&self.bytes[start..start + Label::SIZE])
    }

    /// Write a full record. `payload` must be `data_size` bytes.
    pub(crate) fn write(&mut self, slot: Slot, payload: &[u8], label: Label) {
        let start = self.offset(slot);
        let (data, tail) = self.bytes[start..start + self.stride].split_at_mut(self.data_size);
        data.copy_from_slice(payload);
        tail.copy_from_slice(&label.to_le_bytes());
    }

    /// Overwrite only the payload of an existing record.
    pub(crate) fn write_payload(&mut self, slot: Slot, payload: &[u8]) {
        let start = self.offset(slot);
        self.bytes[start..start + self.data_size].copy_from_slice(payload);
    }

    /// Copy the whole record at `from` over the record at `to`.
    pub(crate) fn copy_record(&mut self, from: Slot, to: Slot) {
        let src = self.offset(from);
        let dst = self.offset(to);
        self.bytes.copy_within(src..src + self.stride, dst);
    }

    /// Zero the record at `slot`.
    pub(crate) fn clear(&mut self, slot: Slot) {
        let start = self.offset(slot);
        self.bytes[start..start + self.stride].fill(0);
    }

    /// Zero every record from `from` to the end of the arena.
    pub(crate) fn clear_from(&mut self, from: Slot) {
        let start = from.0.min(self.capacity) * self.stride;
        self.bytes[start..].fill(0);
    }

    /// Allocate a new arena of `capacity` records holding the first `live` records of this one.
    pub(crate) fn reallocate(
        &self,
        limits: &ResourceLimits,
        capacity: usize,
        live: usize,
    ) -> Result<Self> {
        debug_assert!(live <= capacity && live <= self.capacity);
        let mut next = Self::allocate_within(limits, capacity, self.data_size)?;
        let used = live * self.stride;
        next.bytes[..used].copy_from_slice(&self.bytes[..used]);
        Ok(next)
    }
}
