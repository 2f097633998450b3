//! Chat messages

use wowsrv_core::{Guid, Result};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::{capped_str, BitWriter};

/// CMSG_MESSAGECHAT - Player sends a chat line
///
/// # Packet Format
/// ```text
/// u32      chat type (say, yell, whisper, ...)
/// u32      language
/// bits(9)  message length
/// ----- flush
/// string   message
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsgMessageChat {
    pub chat_type: u32,
    pub language: u32,
    pub message: String,
}

impl CmsgMessageChat {
    pub fn write(&self, w: &mut BitWriter) {
        let message = capped_str(&self.message, 9);
        w.write_u32(self.chat_type);
        w.write_u32(self.language);
        w.write_bits(message.len() as u32, 9);
        w.flush_bits();
        w.write_string(message);
    }
}

impl ClientMessage for CmsgMessageChat {
    const OPCODE: ClientOpcode = ClientOpcode::MessageChat;

    fn read(r: &mut BitReader) -> Result<Self> {
        let chat_type = r.read_u32()?;
        let language = r.read_u32()?;
        let len = r.read_bits(9)? as usize;
        r.reset_bit_pos();
        Ok(Self {
            chat_type,
            language,
            message: r.read_string(len)?,
        })
    }
}

/// SMSG_MESSAGECHAT - Chat line fanned out to recipients
///
/// The channel name is present only for channel chat; its presence bit
/// leads the bit section so all three length prefixes batch into the
/// same flush group.
///
/// # Packet Format
/// ```text
/// bit       has channel name
/// bits(11)  sender name length
/// bits(12)  text length
/// [bits(7)  channel name length]
/// ----- flush
/// u8        chat type
/// u32       language
/// packed guid  sender
/// [string   channel name]
/// string    sender name
/// string    text
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgMessageChat {
    pub chat_type: u8,
    pub language: u32,
    pub sender: Guid,
    pub channel_name: Option<String>,
    pub sender_name: String,
    pub text: String,
}

impl SmsgMessageChat {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let has_channel = r.read_bit()?;
        let name_len = r.read_bits(11)? as usize;
        let text_len = r.read_bits(12)? as usize;
        let channel_len = if has_channel {
            Some(r.read_bits(7)? as usize)
        } else {
            None
        };
        r.reset_bit_pos();
        let chat_type = r.read_u8()?;
        let language = r.read_u32()?;
        let sender = r.read_packed_guid()?;
        let channel_name = match channel_len {
            Some(len) => Some(r.read_string(len)?),
            None => None,
        };
        let sender_name = r.read_string(name_len)?;
        let text = r.read_string(text_len)?;
        Ok(Self {
            chat_type,
            language,
            sender,
            channel_name,
            sender_name,
            text,
        })
    }
}

impl ServerMessage for SmsgMessageChat {
    const OPCODE: ServerOpcode = ServerOpcode::MessageChat;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        let sender_name = capped_str(&self.sender_name, 11);
        let text = capped_str(&self.text, 12);
        let channel_name = self.channel_name.as_deref().map(|c| capped_str(c, 7));

        w.write_bit(channel_name.is_some());
        w.write_bits(sender_name.len() as u32, 11);
        w.write_bits(text.len() as u32, 12);
        if let Some(channel) = channel_name {
            w.write_bits(channel.len() as u32, 7);
        }
        w.flush_bits();
        w.write_u8(self.chat_type);
        w.write_u32(self.language);
        w.write_packed_guid(self.sender);
        if let Some(channel) = channel_name {
            w.write_string(channel);
        }
        w.write_string(sender_name);
        w.write_string(text);
    }
}
