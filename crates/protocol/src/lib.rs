//! # WowSrv Protocol Library
//!
//! This library implements the bit-packed binary wire format of a
//! session-oriented MMO protocol with exact byte-level compatibility as
//! the goal: encoding a value sequence and decoding it with the
//! identical call sequence reproduces the original values and consumes
//! the same number of bytes.
//!
//! ## Architecture
//!
//! ### 1. Codec Layer ([`writer`], [`reader`])
//! A [`BitWriter`]/[`BitReader`] pair supporting free mixing of
//! byte-aligned little-endian primitives and sub-byte bit fields:
//! - Bit fields: 1-32 bits, MSB-first within the field
//! - Packed GUID: sparse byte-mask encoding that omits zero bytes
//! - Packed time: bit-packed calendar timestamp ([`time`])
//! - Strings: raw runs with caller-side bit-width length prefixes, plus
//!   a NUL-terminated variant
//!
//! Each instance lives for exactly one packet's encode or decode; there
//! is no shared state between instances and no locking anywhere.
//!
//! ### 2. Opcodes ([`opcodes`])
//! `ClientOpcode`/`ServerOpcode` identities and the connection
//! [`Channel`] tag the transport routes server messages over.
//!
//! ### 3. Packet Catalog ([`packets`])
//! Concrete message structures. A packet's shape is the fixed sequence
//! of codec calls in its `read`/`write`; the position of every
//! `flush_bits`/`reset_bit_pos` is part of the wire contract.
//!
//! ## Usage Example
//!
//! ```rust
//! use wowsrv_protocol::{BitReader, BitWriter};
//! use wowsrv_core::Guid;
//!
//! let mut w = BitWriter::new();
//! w.write_bit(true);
//! w.write_bits(5, 3);
//! w.flush_bits();
//! w.write_packed_guid(Guid(0x42));
//! let buf = w.finish();
//!
//! let mut r = BitReader::new(&buf);
//! assert!(r.read_bit().unwrap());
//! assert_eq!(r.read_bits(3).unwrap(), 5);
//! r.reset_bit_pos();
//! assert_eq!(r.read_packed_guid().unwrap(), Guid(0x42));
//! ```
//!
//! ## Error Handling
//!
//! Reading past the end of a buffer is a fatal decode error for that
//! packet ([`wowsrv_core::WireError::Underrun`]); values are never
//! zero-filled. Decode failures are local to one packet and reported
//! upward as a single failure. Invalid bit widths and unflushed
//! bit/byte mixing are programmer errors, checked with `debug_assert!`.

pub mod message;
pub mod opcodes;
pub mod packets;
pub mod reader;
pub mod time;
pub mod writer;

// Re-export commonly used items
pub use message::{ClientMessage, ServerMessage};
pub use opcodes::{Channel, ClientOpcode, ServerOpcode};
pub use packets::*;
pub use reader::BitReader;
pub use time::PackedTime;
pub use writer::{capped_str, BitWriter};
