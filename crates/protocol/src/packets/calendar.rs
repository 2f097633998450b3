//! Calendar messages
//!
//! Calendar timestamps travel in the bit-packed calendar form, never as
//! raw Unix seconds; see [`crate::time`].

use wowsrv_core::{Guid, Result};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::time::PackedTime;
use crate::writer::{capped_str, BitWriter};

/// CMSG_CALENDAR_GET_CALENDAR - Request the full snapshot (empty payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmsgCalendarGetCalendar;

impl CmsgCalendarGetCalendar {
    pub fn write(&self, _w: &mut BitWriter) {}
}

impl ClientMessage for CmsgCalendarGetCalendar {
    const OPCODE: ClientOpcode = ClientOpcode::CalendarGetCalendar;

    fn read(_r: &mut BitReader) -> Result<Self> {
        Ok(Self)
    }
}

/// A pending invite on the player's calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarInvite {
    pub event_id: u64,
    pub invite_id: u64,
    pub status: u8,
    pub rank: u8,
}

impl CalendarInvite {
    fn write(&self, w: &mut BitWriter) {
        w.write_u64(self.event_id);
        w.write_u64(self.invite_id);
        w.write_u8(self.status);
        w.write_u8(self.rank);
    }

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            event_id: r.read_u64()?,
            invite_id: r.read_u64()?,
            status: r.read_u8()?,
            rank: r.read_u8()?,
        })
    }
}

/// An event the player can see
///
/// # Packet Format
/// ```text
/// u64          event id
/// bits(8)      title length
/// ----- flush
/// string       title
/// u8           event type
/// packed time  scheduled time
/// u32          flags
/// packed guid  creator
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub event_id: u64,
    pub title: String,
    pub event_type: u8,
    pub time: PackedTime,
    pub flags: u32,
    pub creator: Guid,
}

impl CalendarEvent {
    fn write(&self, w: &mut BitWriter) {
        let title = capped_str(&self.title, 8);
        w.write_u64(self.event_id);
        w.write_bits(title.len() as u32, 8);
        w.flush_bits();
        w.write_string(title);
        w.write_u8(self.event_type);
        w.write_packed_time(self.time);
        w.write_u32(self.flags);
        w.write_packed_guid(self.creator);
    }

    fn read(r: &mut BitReader) -> Result<Self> {
        let event_id = r.read_u64()?;
        let title_len = r.read_bits(8)? as usize;
        r.reset_bit_pos();
        Ok(Self {
            event_id,
            title: r.read_string(title_len)?,
            event_type: r.read_u8()?,
            time: r.read_packed_time()?,
            flags: r.read_u32()?,
            creator: r.read_packed_guid()?,
        })
    }
}

/// SMSG_CALENDAR_SEND_CALENDAR - Full snapshot of invites and events
///
/// # Packet Format
/// ```text
/// packed time  server time
/// u32          invite count
/// invites      (fixed shape each)
/// u32          event count
/// events       (bit-and-byte shape each)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgCalendarSendCalendar {
    pub current_time: PackedTime,
    pub invites: Vec<CalendarInvite>,
    pub events: Vec<CalendarEvent>,
}

impl SmsgCalendarSendCalendar {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let current_time = r.read_packed_time()?;
        let invite_count = r.read_u32()? as usize;
        let mut invites = Vec::with_capacity(invite_count.min(1024));
        for _ in 0..invite_count {
            invites.push(CalendarInvite::read(r)?);
        }
        let event_count = r.read_u32()? as usize;
        let mut events = Vec::with_capacity(event_count.min(1024));
        for _ in 0..event_count {
            events.push(CalendarEvent::read(r)?);
        }
        Ok(Self {
            current_time,
            invites,
            events,
        })
    }
}

impl ServerMessage for SmsgCalendarSendCalendar {
    const OPCODE: ServerOpcode = ServerOpcode::CalendarSendCalendar;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        w.write_packed_time(self.current_time);
        w.write_u32(self.invites.len() as u32);
        for invite in &self.invites {
            invite.write(w);
        }
        w.write_u32(self.events.len() as u32);
        for event in &self.events {
            event.write(w);
        }
    }
}

/// SMSG_CALENDAR_EVENT_INVITE_ALERT - New invite while online
///
/// # Packet Format
/// ```text
/// u64          event id
/// bits(8)      title length
/// ----- flush
/// string       title
/// packed time  scheduled time
/// packed guid  inviter
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsgCalendarEventInviteAlert {
    pub event_id: u64,
    pub title: String,
    pub time: PackedTime,
    pub inviter: Guid,
}

impl SmsgCalendarEventInviteAlert {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        let event_id = r.read_u64()?;
        let title_len = r.read_bits(8)? as usize;
        r.reset_bit_pos();
        Ok(Self {
            event_id,
            title: r.read_string(title_len)?,
            time: r.read_packed_time()?,
            inviter: r.read_packed_guid()?,
        })
    }
}

impl ServerMessage for SmsgCalendarEventInviteAlert {
    const OPCODE: ServerOpcode = ServerOpcode::CalendarEventInviteAlert;
    const CHANNEL: Channel = Channel::Realm;

    fn write(&self, w: &mut BitWriter) {
        let title = capped_str(&self.title, 8);
        w.write_u64(self.event_id);
        w.write_bits(title.len() as u32, 8);
        w.flush_bits();
        w.write_string(title);
        w.write_packed_time(self.time);
        w.write_packed_guid(self.inviter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_roundtrip() {
        let raid_night = PackedTime::from_unix(1_290_521_100).unwrap();
        let msg = SmsgCalendarSendCalendar {
            current_time: PackedTime::from_unix(1_290_434_700).unwrap(),
            invites: vec![CalendarInvite {
                event_id: 1881,
                invite_id: 77,
                status: 0,
                rank: 1,
            }],
            events: vec![
                CalendarEvent {
                    event_id: 1881,
                    title: "ICC 25 heroic".into(),
                    event_type: 1,
                    time: raid_night,
                    flags: 0,
                    creator: Guid(0x1F00_0000_0000_2211),
                },
                CalendarEvent {
                    event_id: 1882,
                    title: String::new(),
                    event_type: 4,
                    time: raid_night,
                    flags: 2,
                    creator: Guid::EMPTY,
                },
            ],
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgCalendarSendCalendar::read(&mut r).unwrap(), msg);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_empty_snapshot() {
        let msg = SmsgCalendarSendCalendar {
            current_time: PackedTime::from_unix(1_290_434_700).unwrap(),
            invites: vec![],
            events: vec![],
        };
        let buf = msg.encode();
        // packed time u32 + two zero u32 counts
        assert_eq!(buf.len(), 12);
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgCalendarSendCalendar::read(&mut r).unwrap(), msg);
    }

    #[test]
    fn test_invite_alert_roundtrip() {
        let msg = SmsgCalendarEventInviteAlert {
            event_id: 400,
            title: "Onyxia attunement run".into(),
            time: PackedTime::from_unix(1_291_125_900).unwrap(),
            inviter: Guid(0xACE),
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        assert_eq!(SmsgCalendarEventInviteAlert::read(&mut r).unwrap(), msg);
    }

    #[test]
    fn test_event_title_truncated_at_255() {
        let msg = SmsgCalendarEventInviteAlert {
            event_id: 1,
            title: "t".repeat(300),
            time: PackedTime::from_unix(1_291_125_900).unwrap(),
            inviter: Guid(0x1),
        };
        let buf = msg.encode();
        let mut r = BitReader::new(&buf);
        let decoded = SmsgCalendarEventInviteAlert::read(&mut r).unwrap();
        assert_eq!(decoded.title.len(), 255);
        assert_eq!(decoded.time, msg.time);
    }
}
