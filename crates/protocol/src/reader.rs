//! Bit-packed stream reader, the exact dual of [`crate::writer`]
//!
//! A reader borrows one packet's payload and is driven through the same
//! fixed sequence of typed reads the writer used, reproducing the
//! original values. Reading past the end of the buffer is a fatal
//! decode error for that packet: the value is never zero-filled, the
//! packet is dropped and the failure reported upward.

use bytes::Buf;
use wowsrv_core::{Guid, Result, Vector3, WireError};

use crate::time::PackedTime;

/// Sequential decoder over one packet payload.
///
/// # Invariant
/// `bit_count` is always in `[0, 8)`. Byte-aligned reads require the
/// bit cursor at 0; packet shapes force this with
/// [`BitReader::reset_bit_pos`] at the same relative positions where
/// the encoder called `flush_bits`.
#[derive(Debug)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    len: usize,
    /// Bits of the current batch byte not yet consumed, MSB next
    bit_val: u8,
    bit_count: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            len: buf.len(),
            bit_val: 0,
            bit_count: 0,
        }
    }

    /// Bytes not yet consumed
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Bytes consumed so far, counting a partially read bit batch
    #[inline]
    pub fn consumed(&self) -> usize {
        self.len - self.buf.len()
    }

    /// True if a partially consumed bit batch is pending
    #[inline]
    pub fn mid_byte(&self) -> bool {
        self.bit_count != 0
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(WireError::Underrun {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    #[inline]
    fn assert_aligned(&self) {
        debug_assert_eq!(
            self.bit_count, 0,
            "byte-aligned read with {} bit(s) pending; missing reset_bit_pos in packet shape",
            self.bit_count
        );
    }

    /// Read a single presence/flag bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_count == 0 {
            self.ensure(1)?;
            self.bit_val = self.buf.get_u8();
            self.bit_count = 8;
        }
        let bit = self.bit_val & 0x80 != 0;
        self.bit_val <<= 1;
        self.bit_count -= 1;
        Ok(bit)
    }

    /// Read `width` bits, MSB-first within the field
    pub fn read_bits(&mut self, width: u32) -> Result<u32> {
        debug_assert!((1..=32).contains(&width), "invalid bit width {width}");
        let mut val = 0u32;
        for _ in 0..width {
            val = (val << 1) | self.read_bit()? as u32;
        }
        Ok(val)
    }

    /// Discard the rest of a partially consumed bit batch
    ///
    /// The decode-side counterpart of the writer's `flush_bits`: the
    /// remaining bits of the current byte are the encoder's zero
    /// padding, so the cursor jumps straight to the next byte boundary.
    /// No-op when already aligned.
    #[inline]
    pub fn reset_bit_pos(&mut self) {
        self.bit_val = 0;
        self.bit_count = 0;
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.assert_aligned();
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.assert_aligned();
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.assert_aligned();
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.assert_aligned();
        self.ensure(8)?;
        Ok(self.buf.get_u64_le())
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.assert_aligned();
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.assert_aligned();
        self.ensure(2)?;
        Ok(self.buf.get_i16_le())
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.assert_aligned();
        self.ensure(4)?;
        Ok(self.buf.get_i32_le())
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        self.assert_aligned();
        self.ensure(8)?;
        Ok(self.buf.get_i64_le())
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.assert_aligned();
        self.ensure(4)?;
        Ok(self.buf.get_f32_le())
    }

    /// Read a world position as three f32 in x, y, z order
    pub fn read_vector3(&mut self) -> Result<Vector3> {
        Ok(Vector3 {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
        })
    }

    /// Read a GUID in the packed (sparse byte-mask) form
    ///
    /// Each transmitted byte is placed at the position indicated by the
    /// corresponding set mask bit; unset positions stay zero.
    pub fn read_packed_guid(&mut self) -> Result<Guid> {
        let mask = self.read_u8()?;
        let mut raw = 0u64;
        for i in 0..8 {
            if mask & (1 << i) != 0 {
                raw |= (self.read_u8()? as u64) << (i * 8);
            }
        }
        Ok(Guid(raw))
    }

    /// Read a timestamp in the bit-packed calendar form
    pub fn read_packed_time(&mut self) -> Result<PackedTime> {
        Ok(PackedTime::from_u32(self.read_u32()?))
    }

    /// Read exactly `len` raw bytes as UTF-8 text
    ///
    /// The length comes from a preceding bit-field read by the caller.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        self.assert_aligned();
        self.ensure(len)?;
        let bytes = self.buf.copy_to_bytes(len);
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Read a NUL-terminated string, consuming the terminator
    pub fn read_cstring(&mut self) -> Result<String> {
        self.assert_aligned();
        let nul = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(WireError::Underrun {
                needed: 1,
                remaining: 0,
            })?;
        let bytes = self.buf.copy_to_bytes(nul);
        self.buf.advance(1);
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Read `len` raw bytes verbatim
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.assert_aligned();
        self.ensure(len)?;
        let bytes = self.buf.copy_to_bytes(len);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BitWriter;

    #[test]
    fn test_read_bits_fixed_vector() {
        let mut r = BitReader::new(&[0b1010_1000]);
        assert_eq!(r.read_bits(3).unwrap(), 0b101);
        assert_eq!(r.read_bits(2).unwrap(), 0b01);
    }

    #[test]
    fn test_reset_bit_pos_skips_padding() {
        let mut r = BitReader::new(&[0b1000_0000, 0x42]);
        assert!(r.read_bit().unwrap());
        r.reset_bit_pos();
        assert_eq!(r.read_u8().unwrap(), 0x42);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_underrun_is_an_error() {
        let mut r = BitReader::new(&[0x01]);
        assert!(matches!(
            r.read_u32(),
            Err(WireError::Underrun { needed: 4, remaining: 1 })
        ));
    }

    #[test]
    fn test_packed_guid_fixed_vector() {
        let mut r = BitReader::new(&[0x01, 0x42]);
        assert_eq!(r.read_packed_guid().unwrap(), Guid(0x42));
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_packed_guid_truncated_data_bytes() {
        // Mask promises two bytes, only one follows
        let mut r = BitReader::new(&[0b0000_0011, 0xCD]);
        assert!(r.read_packed_guid().is_err());
    }

    #[test]
    fn test_packed_guid_roundtrip_extremes() {
        for raw in [0u64, 1, 0x42, 0xFF00, u64::MAX, 0x0123_4567_89AB_CDEF] {
            let mut w = BitWriter::new();
            w.write_packed_guid(Guid(raw));
            let buf = w.finish();
            let mut r = BitReader::new(&buf);
            assert_eq!(r.read_packed_guid().unwrap(), Guid(raw), "raw={raw:#x}");
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn test_cstring_roundtrip() {
        let mut w = BitWriter::new();
        w.write_cstring("arthas");
        w.write_u8(9);
        let buf = w.finish();
        let mut r = BitReader::new(&buf);
        assert_eq!(r.read_cstring().unwrap(), "arthas");
        assert_eq!(r.read_u8().unwrap(), 9);
    }

    #[test]
    fn test_cstring_missing_terminator() {
        let mut r = BitReader::new(b"no-nul");
        assert!(r.read_cstring().is_err());
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut r = BitReader::new(&[0xFF, 0xFE]);
        assert!(matches!(r.read_string(2), Err(WireError::Utf8(_))));
    }

    #[test]
    fn test_consumed_tracks_bit_batch() {
        let mut r = BitReader::new(&[0xFF, 0x01, 0x02]);
        assert_eq!(r.consumed(), 0);
        r.read_bit().unwrap();
        // The whole batch byte is pulled from the buffer on first bit
        assert_eq!(r.consumed(), 1);
        r.reset_bit_pos();
        r.read_u16().unwrap();
        assert_eq!(r.consumed(), 3);
    }

    #[test]
    fn test_mixed_bits_and_bytes_roundtrip() {
        let mut w = BitWriter::new();
        w.write_bits(0b110, 3);
        w.write_bit(true);
        w.flush_bits();
        w.write_u32(0xDEAD_BEEF);
        w.write_bits(0x2A, 7);
        w.flush_bits();
        w.write_u16(7);
        let buf = w.finish();

        let mut r = BitReader::new(&buf);
        assert_eq!(r.read_bits(3).unwrap(), 0b110);
        assert!(r.read_bit().unwrap());
        r.reset_bit_pos();
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_bits(7).unwrap(), 0x2A);
        r.reset_bit_pos();
        assert_eq!(r.read_u16().unwrap(), 7);
        assert_eq!(r.remaining(), 0);
    }
}
