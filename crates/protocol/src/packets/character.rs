//! Character selection screen messages

use wowsrv_core::{Guid, Result, Vector3};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::{capped_str, BitWriter};

/// CMSG_CHAR_CREATE - Create a new character
///
/// The name length rides in a 7-bit prefix; longer input is truncated
/// deterministically before encoding (the realm validates names again
/// upstream, but the wire format must never corrupt on oversize).
///
/// # Packet Format
/// ```text
/// bits(7)  name length
/// ----- flush
/// string   name
/// u8       race
/// u8       class
/// u8       gender
/// u8       skin
/// u8       face
/// u8       hair style
/// u8       hair color
/// u8       facial hair
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsgCharCreate {
    pub name: String,
    pub race: u8,
    pub class: u8,
    pub gender: u8,
    pub skin: u8,
    pub face: u8,
    pub hair_style: u8,
    pub hair_color: u8,
    pub facial_hair: u8,
}

impl CmsgCharCreate {
    pub fn write(&self, w: &mut BitWriter) {
        let name = capped_str(&self.name, 7);
        w.write_bits(name.len() as u32, 7);
        w.flush_bits();
        w.write_string(name);
        w.write_u8(self.race);
        w.write_u8(self.class);
        w.write_u8(self.gender);
        w.write_u8(self.skin);
        w.write_u8(self.face);
        w.write_u8(self.hair_style);
        w.write_u8(self.hair_color);
        w.write_u8(self.facial_hair);
    }
}

impl ClientMessage for CmsgCharCreate {
    const OPCODE: ClientOpcode = ClientOpcode::CharCreate;

    fn read(r: &mut BitReader) -> Result<Self> {
        let name_len = r.read_bits(7)? as usize;
        r.reset_bit_pos();
        Ok(Self {
            name: r.read_string(name_len)?,
            race: r.read_u8()?,
            class: r.read_u8()?,
            gender: r.read_u8()?,
            skin: r.read_u8()?,
            face: r.read_u8()?,
            hair_style: r.read_u8()?,
            hair_color: r.read_u8()?,
            facial_hair: r.read_u8()?,
        })
    }
}

/// CMSG_CHAR_DELETE - Delete a character
///
/// # Packet Format
/// ```text
/// packed guid  character
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmsgCharDelete {
    pub guid: Guid,
}

impl CmsgCharDelete {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_packed_guid(self.guid);
    }
}

impl ClientMessage for CmsgCharDelete {
    const OPCODE: ClientOpcode = ClientOpcode::CharDelete;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            guid: r.read_packed_guid()?,
        })
    }
}

/// CMSG_PLAYER_LOGIN - Enter the world with a selected character
///
/// # Packet Format
/// ```text
/// packed guid  character
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmsgPlayerLogin {
    pub guid: Guid,
}

impl CmsgPlayerLogin {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_packed_guid(self.guid);
    }
}

impl ClientMessage for CmsgPlayerLogin {
    const OPCODE: ClientOpcode = ClientOpcode::PlayerLogin;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            guid: r.read_packed_guid()?,
        })
    }
}

/// CMSG_CHAR_ENUM - Request the character list (empty payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmsgCharEnum;

impl CmsgCharEnum {
    pub fn write(&self, _w: &mut BitWriter) {}
}

impl ClientMessage for CmsgCharEnum {
    const OPCODE: ClientOpcode = ClientOpcode::CharEnum;

    fn read(_r: &mut BitReader) -> Result<Self> {
        Ok(Self)
    }
}

/// One character on the selection screen
#[derive(Debug, Clone, PartialEq)]
pub struct CharEnumEntry {
    pub guid: Guid,
    pub name: String,
    pub level: u8,
    pub race: u8,
    pub class: u8,
    pub gender: u8,
    pub zone: u32,
    pub map: u32,
    pub position: Vector3,
    /// Guild the character belongs to, `Guid::EMPTY` when unguilded
    pub guild: Guid,
    /// Shows the cinematic on first world entry
    pub first_login: bool,
    /// Display ids of the visible equipment slots
    pub equipment: Vec<u32>,
}

/// SMSG_CHAR_ENUM - Character list for the account
///
/// The bit section front-loads every entry's name length and
/// first-login flag; the byte section follows with the entries in the
/// same order. Splitting the shape this way is how the protocol batches
/// sub-byte fields across a whole list.
///
/// # Packet Format
/// ```text
/// bits(5)          character count
/// per character:
///   bits(7)        name length
///   bit            first login
/// ----- flush
/// per character:
///   packed guid    character
///   string         name
///   u8             level
///   u8 u8 u8       race, class, gender
///   u32 u32        zone, map
///   f32 f32 f32    position
///   packed guid    guild
///   u8             equipment count
///   u32 ...        equipment display ids
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmsgCharEnum {
    pub characters: Vec<CharEnumEntry>,
}

impl SmsgCharEnum {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let count = r.read_bits(5)? as usize;
        let mut heads = Vec::with_capacity(count);
        for _ in 0..count {
            let name_len = r.read_bits(7)? as usize;
            let first_login = r.read_bit()?;
            heads.push((name_len, first_login));
        }
        r.reset_bit_pos();

        let mut characters = Vec::with_capacity(count);
        for (name_len, first_login) in heads {
            let guid = r.read_packed_guid()?;
            let name = r.read_string(name_len)?;
            let level = r.read_u8()?;
            let race = r.read_u8()?;
            let class = r.read_u8()?;
            let gender = r.read_u8()?;
            let zone = r.read_u32()?;
            let map = r.read_u32()?;
            let position = r.read_vector3()?;
            let guild = r.read_packed_guid()?;
            let equip_count = r.read_u8()? as usize;
            let mut equipment = Vec::with_capacity(equip_count);
            for _ in 0..equip_count {
                equipment.push(r.read_u32()?);
            }
            characters.push(CharEnumEntry {
                guid,
                name,
                level,
                race,
                class,
                gender,
                zone,
                map,
                position,
                guild,
                first_login,
                equipment,
            });
        }
        Ok(Self { characters })
    }
}

impl ServerMessage for SmsgCharEnum {
    const OPCODE: ServerOpcode = ServerOpcode::CharEnum;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        debug_assert!(self.characters.len() < 32, "character count exceeds 5-bit field");
        w.write_bits(self.characters.len() as u32, 5);
        for c in &self.characters {
            w.write_bits(capped_str(&c.name, 7).len() as u32, 7);
            w.write_bit(c.first_login);
        }
        w.flush_bits();
        for c in &self.characters {
            w.write_packed_guid(c.guid);
            w.write_string(capped_str(&c.name, 7));
            w.write_u8(c.level);
            w.write_u8(c.race);
            w.write_u8(c.class);
            w.write_u8(c.gender);
            w.write_u32(c.zone);
            w.write_u32(c.map);
            w.write_vector3(c.position);
            w.write_packed_guid(c.guild);
            debug_assert!(c.equipment.len() < 256, "equipment count exceeds u8 field");
            w.write_u8(c.equipment.len() as u8);
            for &display_id in &c.equipment {
                w.write_u32(display_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(name: &str) -> CharEnumEntry {
        CharEnumEntry {
            guid: Guid(0x0000_0400_0000_1A2B),
            name: name.into(),
            level: 80,
            race: 6,
            class: 11,
            gender: 0,
            zone: 1637,
            map: 1,
            position: Vector3::new(1629.36, -4373.39, 31.25),
            guild: Guid(0x42),
            first_login: false,
            equipment: vec![51825, 0, 51826],
        }
    }

    #[test]
    fn test_char_enum_roundtrip() {
        let msg = SmsgCharEnum {
            characters: vec![sample_entry("Thrall"), {
                let mut e = sample_entry("Cairne");
                e.first_login = true;
                e.guild = Guid::EMPTY;
                e.equipment = vec![];
                e
            }],
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgCharEnum::read(&mut r).unwrap(), msg);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_char_enum_empty_list() {
        let msg = SmsgCharEnum { characters: vec![] };
        let buf = msg.encode();
        // a lone 5-bit count, flushed
        assert_eq!(&buf[..], &[0x00]);
        let mut r = BitReader::new(&buf);
        assert!(SmsgCharEnum::read(&mut r).unwrap().characters.is_empty());
    }

    #[test]
    #[should_panic(expected = "equipment count")]
    fn test_char_enum_equipment_overflowing_count_byte_panics() {
        // 256 entries would wrap the u8 count to 0 and strand the ids
        // after it as garbage for the decoder.
        let mut entry = sample_entry("Packrat");
        entry.equipment = vec![0; 256];
        let msg = SmsgCharEnum {
            characters: vec![entry],
        };
        let _ = msg.encode();
    }

    #[test]
    fn test_char_create_roundtrip() {
        let msg = CmsgCharCreate {
            name: "Sylvanas".into(),
            race: 5,
            class: 3,
            gender: 1,
            skin: 2,
            face: 6,
            hair_style: 7,
            hair_color: 1,
            facial_hair: 0,
        };
        let mut w = BitWriter::new();
        msg.write(&mut w);
        assert_eq!(CmsgCharCreate::decode(&w.finish()).unwrap(), msg);
    }

    #[test]
    fn test_char_create_name_at_prefix_limit() {
        let name = "a".repeat(127); // 2^7 - 1
        let msg = CmsgCharCreate {
            name: name.clone(),
            race: 1,
            class: 1,
            gender: 0,
            skin: 0,
            face: 0,
            hair_style: 0,
            hair_color: 0,
            facial_hair: 0,
        };
        let mut w = BitWriter::new();
        msg.write(&mut w);
        let decoded = CmsgCharCreate::decode(&w.finish()).unwrap();
        assert_eq!(decoded.name, name);
    }

    #[test]
    fn test_char_create_oversize_name_truncates_cleanly() {
        let msg = CmsgCharCreate {
            name: "a".repeat(128),
            race: 1,
            class: 1,
            gender: 0,
            skin: 0,
            face: 0,
            hair_style: 0,
            hair_color: 0,
            facial_hair: 9,
        };
        let mut w = BitWriter::new();
        msg.write(&mut w);
        let decoded = CmsgCharCreate::decode(&w.finish()).unwrap();
        assert_eq!(decoded.name.len(), 127);
        // the fields after the string stay intact
        assert_eq!(decoded.facial_hair, 9);
    }

    #[test]
    fn test_player_login_roundtrip() {
        let msg = CmsgPlayerLogin {
            guid: Guid(0x0000_0400_0000_1A2B),
        };
        let mut w = BitWriter::new();
        msg.write(&mut w);
        assert_eq!(CmsgPlayerLogin::decode(&w.finish()).unwrap(), msg);
    }
}
