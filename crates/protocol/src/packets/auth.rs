//! Session handshake and keepalive messages

use wowsrv_core::{AccountName, Result};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// One client-side addon reported during the handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonInfo {
    /// Addon directory name
    pub name: String,
    /// Whether the addon is enabled client-side
    pub enabled: bool,
    /// CRC of the addon's public signature block
    pub crc: u32,
}

impl AddonInfo {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_cstring(&self.name);
        w.write_u8(self.enabled as u8);
        w.write_u32(self.crc);
    }

    pub fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            name: r.read_cstring()?,
            enabled: r.read_u8()? != 0,
            crc: r.read_u32()?,
        })
    }
}

/// CMSG_AUTH_SESSION - Client opens the game session
///
/// First message on a fresh connection, after the transport-level auth
/// challenge (out of scope here).
///
/// # Packet Format
/// ```text
/// u32      client build
/// u32      realm id
/// cstring  account name
/// u32      local challenge
/// u32      addon count
/// addons   name cstring, u8 enabled, u32 crc (each)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsgAuthSession {
    pub build: u32,
    pub realm_id: u32,
    pub account: AccountName,
    pub local_challenge: u32,
    pub addons: Vec<AddonInfo>,
}

impl CmsgAuthSession {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_u32(self.build);
        w.write_u32(self.realm_id);
        w.write_cstring(self.account.get());
        w.write_u32(self.local_challenge);
        w.write_u32(self.addons.len() as u32);
        for addon in &self.addons {
            addon.write(w);
        }
    }
}

impl ClientMessage for CmsgAuthSession {
    const OPCODE: ClientOpcode = ClientOpcode::AuthSession;

    fn read(r: &mut BitReader) -> Result<Self> {
        let build = r.read_u32()?;
        let realm_id = r.read_u32()?;
        let account = AccountName::new(r.read_cstring()?);
        let local_challenge = r.read_u32()?;
        let count = r.read_u32()? as usize;
        let mut addons = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            addons.push(AddonInfo::read(r)?);
        }
        Ok(Self {
            build,
            realm_id,
            account,
            local_challenge,
            addons,
        })
    }
}

/// SMSG_AUTH_RESPONSE - Session accepted, queued, or rejected
///
/// # Packet Format
/// ```text
/// bit   has queue position
/// ----- flush
/// u8    result code
/// [u32  queue position, if the bit is set]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgAuthResponse {
    pub result: u8,
    /// Login queue slot, present only while the realm is full
    pub queue_position: Option<u32>,
}

impl SmsgAuthResponse {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let has_queue = r.read_bit()?;
        r.reset_bit_pos();
        let result = r.read_u8()?;
        let queue_position = if has_queue { Some(r.read_u32()?) } else { None };
        Ok(Self {
            result,
            queue_position,
        })
    }
}

impl ServerMessage for SmsgAuthResponse {
    const OPCODE: ServerOpcode = ServerOpcode::AuthResponse;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        w.write_bit(self.queue_position.is_some());
        w.flush_bits();
        w.write_u8(self.result);
        if let Some(pos) = self.queue_position {
            w.write_u32(pos);
        }
    }
}

/// CMSG_PING - Keepalive with client-measured latency
///
/// # Packet Format
/// ```text
/// u32  sequence
/// u32  round-trip latency (ms)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmsgPing {
    pub sequence: u32,
    pub latency: u32,
}

impl CmsgPing {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_u32(self.sequence);
        w.write_u32(self.latency);
    }
}

impl ClientMessage for CmsgPing {
    const OPCODE: ClientOpcode = ClientOpcode::Ping;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            sequence: r.read_u32()?,
            latency: r.read_u32()?,
        })
    }
}

/// SMSG_PONG - Keepalive reply echoing the ping sequence
///
/// # Packet Format
/// ```text
/// u32  sequence
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsgPong {
    pub sequence: u32,
}

impl SmsgPong {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            sequence: r.read_u32()?,
        })
    }
}

impl ServerMessage for SmsgPong {
    const OPCODE: ServerOpcode = ServerOpcode::Pong;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        w.write_u32(self.sequence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_auth_session(msg: &CmsgAuthSession) -> CmsgAuthSession {
        let mut w = BitWriter::new();
        msg.write(&mut w);
        CmsgAuthSession::decode(&w.finish()).unwrap()
    }

    #[test]
    fn test_auth_session_roundtrip() {
        let msg = CmsgAuthSession {
            build: 15595,
            realm_id: 3,
            account: "FROSTWOLF".into(),
            local_challenge: 0xDEAD_BEEF,
            addons: vec![
                AddonInfo {
                    name: "Blizzard_AuctionUI".into(),
                    enabled: true,
                    crc: 0x4C1C_776D,
                },
                AddonInfo {
                    name: "Blizzard_Calendar".into(),
                    enabled: false,
                    crc: 0,
                },
            ],
        };
        let decoded = roundtrip_auth_session(&msg);
        assert_eq!(decoded.account, AccountName::from("FROSTWOLF"));
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_auth_session_empty_addon_list() {
        let msg = CmsgAuthSession {
            build: 15595,
            realm_id: 1,
            account: "A".into(),
            local_challenge: 1,
            addons: vec![],
        };
        assert_eq!(roundtrip_auth_session(&msg), msg);
    }

    #[test]
    fn test_auth_response_queue_absent_writes_one_presence_bit() {
        let msg = SmsgAuthResponse {
            result: 0x0C,
            queue_position: None,
        };
        let buf = msg.encode();
        // one flushed bit byte + result, no value bytes for the option
        assert_eq!(&buf[..], &[0x00, 0x0C]);

        let mut r = BitReader::new(&buf);
        let decoded = SmsgAuthResponse::read(&mut r).unwrap();
        assert_eq!(decoded.queue_position, None);
    }

    #[test]
    fn test_auth_response_queue_present() {
        let msg = SmsgAuthResponse {
            result: 0x1B,
            queue_position: Some(214),
        };
        let buf = msg.encode();
        assert_eq!(buf[0], 0x80); // presence bit in the MSB of the flushed byte
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgAuthResponse::read(&mut r).unwrap(), msg);
    }

    #[test]
    fn test_ping_pong_fixed_vectors() {
        let mut w = BitWriter::new();
        CmsgPing {
            sequence: 1,
            latency: 54,
        }
        .write(&mut w);
        assert_eq!(&w.finish()[..], &[1, 0, 0, 0, 54, 0, 0, 0]);

        let pong = SmsgPong { sequence: 1 }.encode();
        assert_eq!(&pong[..], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_auth_session_truncated_addon_list() {
        let msg = CmsgAuthSession {
            build: 15595,
            realm_id: 1,
            account: "B".into(),
            local_challenge: 2,
            addons: vec![AddonInfo {
                name: "X".into(),
                enabled: true,
                crc: 5,
            }],
        };
        let mut w = BitWriter::new();
        msg.write(&mut w);
        let buf = w.finish();
        // Chop the last addon short; decode must fail, not zero-fill
        assert!(CmsgAuthSession::decode(&buf[..buf.len() - 2]).is_err());
    }
}
