//! Bit-packed stream writer with exact wire compatibility
//!
//! The writer accumulates one outbound packet's payload. Byte-aligned
//! primitives are little-endian; sub-byte fields are batched into a
//! pending byte and committed on [`BitWriter::flush_bits`]. The position
//! of every `flush_bits` call relative to the surrounding fields is part
//! of each packet's wire shape and must match the decoder exactly.
//!
//! ## Bit Order Convention
//!
//! - **Within a bit batch**: MSB-first (the first bit written lands in
//!   bit 7 of the committed byte)
//! - **Byte-aligned integers**: little-endian

use bytes::{BufMut, BytesMut};
use wowsrv_core::{Guid, Vector3};

use crate::time::PackedTime;

/// Sequential encoder for one packet payload.
///
/// A writer lives for exactly one packet's encode: construct, drive
/// through the packet's fixed field order, then [`BitWriter::finish`].
///
/// # Invariant
/// `bit_count` is always in `[0, 8)`. A pending bit batch must be
/// flushed before any byte-aligned write; mixing the two without a
/// flush is a bug in the packet shape, not a runtime condition, so it
/// is only checked with `debug_assert!`.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: BytesMut,
    /// Bit batch under construction, filled from bit 7 downward
    bit_val: u8,
    /// Number of bits already placed in `bit_val`
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            bit_val: 0,
            bit_count: 0,
        }
    }

    /// Number of committed bytes
    ///
    /// Used by packets that announce a sub-buffer's size before splicing
    /// it into the outer stream. Bits still pending in the current batch
    /// are not counted until flushed.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True if a partially filled bit batch is pending
    #[inline]
    pub fn mid_byte(&self) -> bool {
        self.bit_count != 0
    }

    /// Write a single presence/flag bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_val |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.buf.put_u8(self.bit_val);
            self.bit_val = 0;
            self.bit_count = 0;
        }
    }

    /// Write the low `width` bits of `value`, MSB-first within the field
    ///
    /// # Format
    /// - `width` must be in `[1, 32]`
    /// - Bits above `width` in `value` are ignored
    #[inline]
    pub fn write_bits(&mut self, value: u32, width: u32) {
        debug_assert!((1..=32).contains(&width), "invalid bit width {width}");
        for i in (0..width).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    /// Commit a pending partial bit batch, zero-padding the unused low bits
    ///
    /// No-op when already byte-aligned, so packet shapes may call it
    /// unconditionally at the end of each bit group.
    #[inline]
    pub fn flush_bits(&mut self) {
        if self.bit_count != 0 {
            self.buf.put_u8(self.bit_val);
            self.bit_val = 0;
            self.bit_count = 0;
        }
    }

    #[inline]
    fn assert_aligned(&self) {
        debug_assert_eq!(
            self.bit_count, 0,
            "byte-aligned write with {} bit(s) pending; missing flush_bits in packet shape",
            self.bit_count
        );
    }

    #[inline]
    pub fn write_u8(&mut self, val: u8) {
        self.assert_aligned();
        self.buf.put_u8(val);
    }

    #[inline]
    pub fn write_u16(&mut self, val: u16) {
        self.assert_aligned();
        self.buf.put_u16_le(val);
    }

    #[inline]
    pub fn write_u32(&mut self, val: u32) {
        self.assert_aligned();
        self.buf.put_u32_le(val);
    }

    #[inline]
    pub fn write_u64(&mut self, val: u64) {
        self.assert_aligned();
        self.buf.put_u64_le(val);
    }

    #[inline]
    pub fn write_i8(&mut self, val: i8) {
        self.assert_aligned();
        self.buf.put_i8(val);
    }

    #[inline]
    pub fn write_i16(&mut self, val: i16) {
        self.assert_aligned();
        self.buf.put_i16_le(val);
    }

    #[inline]
    pub fn write_i32(&mut self, val: i32) {
        self.assert_aligned();
        self.buf.put_i32_le(val);
    }

    #[inline]
    pub fn write_i64(&mut self, val: i64) {
        self.assert_aligned();
        self.buf.put_i64_le(val);
    }

    #[inline]
    pub fn write_f32(&mut self, val: f32) {
        self.assert_aligned();
        self.buf.put_f32_le(val);
    }

    /// Write a world position as three f32 in x, y, z order
    #[inline]
    pub fn write_vector3(&mut self, val: Vector3) {
        self.write_f32(val.x);
        self.write_f32(val.y);
        self.write_f32(val.z);
    }

    /// Write a GUID in the packed (sparse byte-mask) form
    ///
    /// # Format
    /// - 1 byte: mask, bit `i` set iff byte `i` of the GUID is non-zero
    /// - For each set mask bit, ascending: that byte of the GUID
    ///
    /// `Guid::EMPTY` encodes as the single byte `0x00`.
    pub fn write_packed_guid(&mut self, guid: Guid) {
        self.assert_aligned();
        let raw = guid.raw();
        let mut mask = 0u8;
        for i in 0..8 {
            if (raw >> (i * 8)) & 0xFF != 0 {
                mask |= 1 << i;
            }
        }
        self.buf.put_u8(mask);
        for i in 0..8 {
            if mask & (1 << i) != 0 {
                self.buf.put_u8((raw >> (i * 8)) as u8);
            }
        }
    }

    /// Write a timestamp in the bit-packed calendar form
    ///
    /// # Format
    /// One little-endian u32 laid out as described in [`crate::time`].
    #[inline]
    pub fn write_packed_time(&mut self, time: PackedTime) {
        self.write_u32(time.as_u32());
    }

    /// Write raw string bytes with no prefix or terminator
    ///
    /// The length prefix, when the packet shape has one, is a separate
    /// bit-field written by the caller before this; the writer does not
    /// enforce that coupling.
    #[inline]
    pub fn write_string(&mut self, val: &str) {
        self.assert_aligned();
        self.buf.put_slice(val.as_bytes());
    }

    /// Write raw string bytes followed by a NUL terminator
    #[inline]
    pub fn write_cstring(&mut self, val: &str) {
        self.assert_aligned();
        self.buf.put_slice(val.as_bytes());
        self.buf.put_u8(0);
    }

    /// Append an already-encoded sub-buffer verbatim
    ///
    /// Used when a structure is written to a temporary writer so its
    /// byte size can be announced before the bytes themselves.
    #[inline]
    pub fn write_bytes(&mut self, val: &[u8]) {
        self.assert_aligned();
        self.buf.put_slice(val);
    }

    /// Flush any pending bits and hand off the finished payload
    pub fn finish(mut self) -> BytesMut {
        self.flush_bits();
        self.buf
    }
}

/// Truncate `val` to the longest prefix whose byte length fits in a
/// `width`-bit length field, respecting char boundaries.
///
/// Several packet shapes carry user-supplied names behind narrow length
/// prefixes (6 to 14 bits) with no upstream validation. Oversized input
/// is truncated deterministically here rather than corrupting the
/// fields that follow.
pub fn capped_str(val: &str, width: u32) -> &str {
    let max = (1usize << width) - 1;
    if val.len() <= max {
        return val;
    }
    let mut end = max;
    while !val.is_char_boundary(end) {
        end -= 1;
    }
    &val[..end]
}
