//! Message traits tying packet shapes to their opcodes
//!
//! A packet shape is the fixed, hand-specified sequence of codec calls
//! in its `read`/`write` implementation; there is no runtime schema.
//! Client messages decode, server messages encode. The session layer
//! (out of scope here) picks the concrete type from the opcode and
//! routes the encoded payload over the tagged channel.

use bytes::BytesMut;
use wowsrv_core::Result;

use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// A message the client sends and the server decodes.
pub trait ClientMessage: Sized {
    const OPCODE: ClientOpcode;

    /// Decode the payload in this message's fixed field order.
    ///
    /// All-or-nothing: any error leaves the message undecoded and the
    /// packet is dropped by the caller.
    fn read(r: &mut BitReader) -> Result<Self>;

    /// Decode from a raw payload buffer.
    fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(payload);
        let msg = Self::read(&mut r)?;
        if r.remaining() != 0 {
            // Tolerated for protocol evolution, but worth noticing.
            tracing::debug!(
                opcode = ?Self::OPCODE,
                trailing = r.remaining(),
                "trailing bytes after decode"
            );
        }
        Ok(msg)
    }
}

/// A message the server encodes and the client decodes.
pub trait ServerMessage {
    const OPCODE: ServerOpcode;
    /// Connection the transport routes this message over.
    const CHANNEL: Channel;

    /// Encode the payload in this message's fixed field order.
    fn write(&self, w: &mut BitWriter);

    /// Encode into a finished payload buffer.
    fn encode(&self) -> BytesMut {
        let mut w = BitWriter::new();
        self.write(&mut w);
        let buf = w.finish();
        tracing::trace!(
            opcode = ?Self::OPCODE,
            channel = ?Self::CHANNEL,
            len = buf.len(),
            "encoded message"
        );
        buf
    }
}
