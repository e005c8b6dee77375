//! Address decomposition.
//!
//! This module splits a byte address into the coordinates a set-associative
//! cache needs. It provides the following:
//! 1. **Decoding:** Byte address to `(set, tag, offset)`, rejecting out-of-range addresses.
//! 2. **Encoding:** `(tag, set)` back to the line-aligned byte address, used to report evictions.
//!
//! Set index is `(addr / line_bytes) % num_sets` and tag is
//! `addr / (line_bytes * num_sets)`, so set counts that are not a power of two
//! (e.g. 3-way caches) decode correctly.

use super::error::AccessError;

/// A decoded byte address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Set index in `0..num_sets`.
    pub set: usize,
    /// Tag stored in the line.
    pub tag: u64,
    /// Byte offset within the line.
    pub offset: u64,
}

/// Maps byte addresses onto sets and tags for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressMap {
    line_bytes: u64,
    num_sets: u64,
    addr_bits: u32,
    require_aligned: bool,
}

impl AddressMap {
    /// Creates an address map.
    ///
    /// The caller guarantees `line_bytes > 0`, `num_sets > 0` and
    /// `1 <= addr_bits <= 64`; `CacheConfig::validate` enforces this.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - Line size in bytes.
    /// * `num_sets` - Number of sets.
    /// * `addr_bits` - Width of the address space in bits.
    /// * `require_aligned` - Reject addresses that are not line-aligned.
    pub const fn new(line_bytes: usize, num_sets: usize, addr_bits: u32, require_aligned: bool) -> Self {
        Self {
            line_bytes: line_bytes as u64,
            num_sets: num_sets as u64,
            addr_bits,
            require_aligned,
        }
    }

    /// Returns the width of the address space in bits.
    #[inline(always)]
    pub const fn addr_bits(&self) -> u32 {
        self.addr_bits
    }

    /// Returns the number of sets this map spreads addresses across.
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        self.num_sets as usize
    }

    /// Decodes a byte address.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AddressOutOfRange` if the address has bits set at
    /// or above `addr_bits`, and `AccessError::Misaligned` if alignment is
    /// required and the address is not a multiple of the line size.
    pub const fn decode(&self, addr: u64) -> Result<Decoded, AccessError> {
        if self.addr_bits < 64 && (addr >> self.addr_bits) != 0 {
            return Err(AccessError::AddressOutOfRange {
                addr,
                addr_bits: self.addr_bits,
            });
        }
        let offset = addr % self.line_bytes;
        if self.require_aligned && offset != 0 {
            return Err(AccessError::Misaligned {
                addr,
                line_bytes: self.line_bytes as usize,
            });
        }
        let line = addr / self.line_bytes;
        Ok(Decoded {
            set: (line % self.num_sets) as usize,
            tag: line / self.num_sets,
            offset,
        })
    }

    /// Rebuilds the line-aligned byte address that holds `tag` in `set`.
    #[inline]
    pub const fn line_address(&self, tag: u64, set: usize) -> u64 {
        (tag * self.num_sets + set as u64) * self.line_bytes
    }
}
