//! Guild query and roster messages

use wowsrv_core::{Guid, Result};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::time::PackedTime;
use crate::writer::{capped_str, BitWriter};

/// CMSG_GUILD_QUERY - Look up a guild by id
///
/// # Packet Format
/// ```text
/// u32  guild id
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmsgGuildQuery {
    pub guild_id: u32,
}

impl CmsgGuildQuery {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_u32(self.guild_id);
    }
}

impl ClientMessage for CmsgGuildQuery {
    const OPCODE: ClientOpcode = ClientOpcode::GuildQuery;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            guild_id: r.read_u32()?,
        })
    }
}

/// One guild rank definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRank {
    pub id: u32,
    pub rights: u32,
    pub name: String,
}

/// SMSG_GUILD_QUERY_RESPONSE - Name, ranks and emblem of a guild
///
/// # Packet Format
/// ```text
/// u32        guild id
/// bits(7)    guild name length
/// bits(6)    rank count
/// per rank:
///   bits(7)  rank name length
/// ----- flush
/// string     guild name
/// per rank:
///   u32      rank id
///   u32      rights mask
///   string   rank name
/// u32 x5     emblem style, emblem color, border style,
///            border color, background color
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgGuildQueryResponse {
    pub guild_id: u32,
    pub name: String,
    pub ranks: Vec<GuildRank>,
    pub emblem_style: u32,
    pub emblem_color: u32,
    pub border_style: u32,
    pub border_color: u32,
    pub background_color: u32,
}

impl SmsgGuildQueryResponse {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let guild_id = r.read_u32()?;
        let name_len = r.read_bits(7)? as usize;
        let rank_count = r.read_bits(6)? as usize;
        let mut rank_name_lens = Vec::with_capacity(rank_count);
        for _ in 0..rank_count {
            rank_name_lens.push(r.read_bits(7)? as usize);
        }
        r.reset_bit_pos();
        let name = r.read_string(name_len)?;
        let mut ranks = Vec::with_capacity(rank_count);
        for len in rank_name_lens {
            ranks.push(GuildRank {
                id: r.read_u32()?,
                rights: r.read_u32()?,
                name: r.read_string(len)?,
            });
        }
        Ok(Self {
            guild_id,
            name,
            ranks,
            emblem_style: r.read_u32()?,
            emblem_color: r.read_u32()?,
            border_style: r.read_u32()?,
            border_color: r.read_u32()?,
            background_color: r.read_u32()?,
        })
    }
}

impl ServerMessage for SmsgGuildQueryResponse {
    const OPCODE: ServerOpcode = ServerOpcode::GuildQueryResponse;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        debug_assert!(self.ranks.len() < 64, "rank count exceeds 6-bit field");
        let name = capped_str(&self.name, 7);
        w.write_u32(self.guild_id);
        w.write_bits(name.len() as u32, 7);
        w.write_bits(self.ranks.len() as u32, 6);
        for rank in &self.ranks {
            w.write_bits(capped_str(&rank.name, 7).len() as u32, 7);
        }
        w.flush_bits();
        w.write_string(name);
        for rank in &self.ranks {
            w.write_u32(rank.id);
            w.write_u32(rank.rights);
            w.write_string(capped_str(&rank.name, 7));
        }
        w.write_u32(self.emblem_style);
        w.write_u32(self.emblem_color);
        w.write_u32(self.border_style);
        w.write_u32(self.border_color);
        w.write_u32(self.background_color);
    }
}

/// Whether a roster member is online, and when they last logged out
///
/// The wire couples the two: the online bit decides whether a logout
/// time follows, so a single state covers both and no unrepresentable
/// combination exists. Packed value 0 means "never logged out".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberPresence {
    Online,
    Offline { last_logout: PackedTime },
}

/// One member in the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub guid: Guid,
    pub name: String,
    pub rank_id: u32,
    pub level: u8,
    pub class: u8,
    pub zone: u32,
    pub presence: MemberPresence,
    /// Visible to players with the officer-note right
    pub officer_note: Option<String>,
}

/// SMSG_GUILD_ROSTER - Full member list of the player's guild
///
/// # Packet Format
/// ```text
/// bits(11)   motd length
/// bits(9)    member count
/// per member:
///   bit      online
///   bit      has officer note
///   [bits(8) officer note length]
///   bits(6)  member name length
/// ----- flush
/// string     motd
/// per member:
///   packed guid
///   string   name
///   u32      rank id
///   u8       level
///   u8       class
///   u32      zone
///   [packed time  last logout, offline members only]
///   [string  officer note]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmsgGuildRoster {
    pub motd: String,
    pub members: Vec<GuildMember>,
}

impl SmsgGuildRoster {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let motd_len = r.read_bits(11)? as usize;
        let member_count = r.read_bits(9)? as usize;
        struct Head {
            online: bool,
            note_len: Option<usize>,
            name_len: usize,
        }
        let mut heads = Vec::with_capacity(member_count);
        for _ in 0..member_count {
            let online = r.read_bit()?;
            let has_note = r.read_bit()?;
            let note_len = if has_note {
                Some(r.read_bits(8)? as usize)
            } else {
                None
            };
            let name_len = r.read_bits(6)? as usize;
            heads.push(Head {
                online,
                note_len,
                name_len,
            });
        }
        r.reset_bit_pos();
        let motd = r.read_string(motd_len)?;
        let mut members = Vec::with_capacity(member_count);
        for head in heads {
            let guid = r.read_packed_guid()?;
            let name = r.read_string(head.name_len)?;
            let rank_id = r.read_u32()?;
            let level = r.read_u8()?;
            let class = r.read_u8()?;
            let zone = r.read_u32()?;
            let presence = if head.online {
                MemberPresence::Online
            } else {
                MemberPresence::Offline {
                    last_logout: r.read_packed_time()?,
                }
            };
            let officer_note = match head.note_len {
                Some(len) => Some(r.read_string(len)?),
                None => None,
            };
            members.push(GuildMember {
                guid,
                name,
                rank_id,
                level,
                class,
                zone,
                presence,
                officer_note,
            });
        }
        Ok(Self { motd, members })
    }
}

impl ServerMessage for SmsgGuildRoster {
    const OPCODE: ServerOpcode = ServerOpcode::GuildRoster;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        debug_assert!(self.members.len() < 512, "member count exceeds 9-bit field");
        let motd = capped_str(&self.motd, 11);
        w.write_bits(motd.len() as u32, 11);
        w.write_bits(self.members.len() as u32, 9);
        for m in &self.members {
            w.write_bit(matches!(m.presence, MemberPresence::Online));
            let note = m.officer_note.as_deref().map(|n| capped_str(n, 8));
            w.write_bit(note.is_some());
            if let Some(note) = note {
                w.write_bits(note.len() as u32, 8);
            }
            w.write_bits(capped_str(&m.name, 6).len() as u32, 6);
        }
        w.flush_bits();
        w.write_string(motd);
        for m in &self.members {
            w.write_packed_guid(m.guid);
            w.write_string(capped_str(&m.name, 6));
            w.write_u32(m.rank_id);
            w.write_u8(m.level);
            w.write_u8(m.class);
            w.write_u32(m.zone);
            if let MemberPresence::Offline { last_logout } = m.presence {
                w.write_packed_time(last_logout);
            }
            if let Some(note) = m.officer_note.as_deref() {
                w.write_string(capped_str(note, 8));
            }
        }
    }
}
