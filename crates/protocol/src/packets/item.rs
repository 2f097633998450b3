//! Item and trade messages

use wowsrv_core::{Guid, Result};

use crate::message::ServerMessage;
use crate::opcodes::{Channel, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Random-property roll attached to an item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomProperty {
    pub property_id: u32,
    pub suffix_factor: u32,
}

/// One enchantment slot on an item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemEnchant {
    pub id: u32,
    pub duration: u32,
    pub charges: u32,
}

/// A concrete item as it appears in bags, loot and trade windows
///
/// Nested into many packets; it carries its own bit group so the
/// embedding packet's flush points stay independent of it.
///
/// # Packet Format
/// ```text
/// bit        has random property
/// bits(3)    enchant count
/// ----- flush
/// u32        item entry
/// [u32 u32   property id, suffix factor]
/// per enchant:
///   u32 u32 u32  id, duration, charges
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInstance {
    pub entry: u32,
    pub random_property: Option<RandomProperty>,
    pub enchants: Vec<ItemEnchant>,
}

impl ItemInstance {
    pub fn write(&self, w: &mut BitWriter) {
        debug_assert!(self.enchants.len() < 8, "enchant count exceeds 3-bit field");
        w.write_bit(self.random_property.is_some());
        w.write_bits(self.enchants.len() as u32, 3);
        w.flush_bits();
        w.write_u32(self.entry);
        if let Some(prop) = self.random_property {
            w.write_u32(prop.property_id);
            w.write_u32(prop.suffix_factor);
        }
        for enchant in &self.enchants {
            w.write_u32(enchant.id);
            w.write_u32(enchant.duration);
            w.write_u32(enchant.charges);
        }
    }

    pub fn read(r: &mut BitReader) -> Result<Self> {
        let has_property = r.read_bit()?;
        let enchant_count = r.read_bits(3)? as usize;
        r.reset_bit_pos();
        let entry = r.read_u32()?;
        let random_property = if has_property {
            Some(RandomProperty {
                property_id: r.read_u32()?,
                suffix_factor: r.read_u32()?,
            })
        } else {
            None
        };
        let mut enchants = Vec::with_capacity(enchant_count);
        for _ in 0..enchant_count {
            enchants.push(ItemEnchant {
                id: r.read_u32()?,
                duration: r.read_u32()?,
                charges: r.read_u32()?,
            });
        }
        Ok(Self {
            entry,
            random_property,
            enchants,
        })
    }
}

/// SMSG_ITEM_PUSH_RESULT - Item arrived in the player's bags
///
/// # Packet Format
/// ```text
/// bit          from loot (vs. created/received)
/// bit          show in chat
/// ----- flush
/// packed guid  receiving player
/// u32          bag slot
/// u32          quantity
/// item         nested shape (own bit group)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgItemPushResult {
    pub player: Guid,
    pub from_loot: bool,
    pub show_in_chat: bool,
    pub slot: u32,
    pub quantity: u32,
    pub item: ItemInstance,
}

impl SmsgItemPushResult {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let from_loot = r.read_bit()?;
        let show_in_chat = r.read_bit()?;
        r.reset_bit_pos();
        Ok(Self {
            from_loot,
            show_in_chat,
            player: r.read_packed_guid()?,
            slot: r.read_u32()?,
            quantity: r.read_u32()?,
            item: ItemInstance::read(r)?,
        })
    }
}

impl ServerMessage for SmsgItemPushResult {
    const OPCODE: ServerOpcode = ServerOpcode::ItemPushResult;
    const CHANNEL: Channel = Channel::Instance;

    fn write(&self, w: &mut BitWriter) {
        w.write_bit(self.from_loot);
        w.write_bit(self.show_in_chat);
        w.flush_bits();
        w.write_packed_guid(self.player);
        w.write_u32(self.slot);
        w.write_u32(self.quantity);
        self.item.write(w);
    }
}

/// SMSG_TRADE_STATUS - Trade window state transition
///
/// # Packet Format
/// ```text
/// bit          has partner
/// ----- flush
/// u32          status code
/// [packed guid partner, on trade initiation]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsgTradeStatus {
    pub status: u32,
    pub partner: Option<Guid>,
}

impl SmsgTradeStatus {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let has_partner = r.read_bit()?;
        r.reset_bit_pos();
        Ok(Self {
            status: r.read_u32()?,
            partner: if has_partner {
                Some(r.read_packed_guid()?)
            } else {
                None
            },
        })
    }
}

impl ServerMessage for SmsgTradeStatus {
    const OPCODE: ServerOpcode = ServerOpcode::TradeStatus;
    const CHANNEL: Channel = Channel::Instance;

    fn write(&self, w: &mut BitWriter) {
        w.write_bit(self.partner.is_some());
        w.flush_bits();
        w.write_u32(self.status);
        if let Some(partner) = self.partner {
            w.write_packed_guid(partner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enchanted_item() -> ItemInstance {
        ItemInstance {
            entry: 49623, // Shadowmourne
            random_property: None,
            enchants: vec![
                ItemEnchant {
                    id: 3847,
                    duration: 0,
                    charges: 0,
                },
                ItemEnchant {
                    id: 3789,
                    duration: 3600,
                    charges: 0,
                },
            ],
        }
    }

    #[test]
    fn test_item_instance_roundtrip() {
        let item = ItemInstance {
            entry: 19019,
            random_property: Some(RandomProperty {
                property_id: 681,
                suffix_factor: 0,
            }),
            enchants: vec![],
        };
        let mut w = BitWriter::new();
        item.write(&mut w);
        let buf = w.finish();
        let mut r = BitReader::new(&buf);
        assert_eq!(ItemInstance::read(&mut r).unwrap(), item);
    }

    #[test]
    fn test_item_instance_plain_costs_five_bytes() {
        // no property, no enchants: one bit byte + entry
        let item = ItemInstance {
            entry: 6948,
            random_property: None,
            enchants: vec![],
        };
        let mut w = BitWriter::new();
        item.write(&mut w);
        assert_eq!(w.finish().len(), 5);
    }

    #[test]
    fn test_push_result_roundtrip() {
        let msg = SmsgItemPushResult {
            player: Guid(0x3D0A),
            from_loot: true,
            show_in_chat: true,
            slot: 255,
            quantity: 1,
            item: enchanted_item(),
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgItemPushResult::read(&mut r).unwrap(), msg);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_trade_status_partner_absent() {
        let msg = SmsgTradeStatus {
            status: 2,
            partner: None,
        };
        let buf = msg.encode();
        assert_eq!(&buf[..], &[0x00, 0x02, 0x00, 0x00, 0x00]);
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgTradeStatus::read(&mut r).unwrap().partner, None);
    }

    #[test]
    fn test_trade_status_partner_present() {
        let msg = SmsgTradeStatus {
            status: 1,
            partner: Some(Guid(0xBEEF)),
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgTradeStatus::read(&mut r).unwrap(), msg);
    }
}
