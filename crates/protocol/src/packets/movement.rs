//! Movement messages
//!
//! Every movement opcode carries the same [`MovementInfo`] block; the
//! opcode itself says what changed (started forward, stopped, ...).

use wowsrv_core::{Guid, Result, Vector3};

use crate::message::{ClientMessage, ServerMessage};
use crate::opcodes::{Channel, ClientOpcode, ServerOpcode};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Vehicle/elevator the unit is standing on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportInfo {
    pub guid: Guid,
    /// Offset from the transport's origin, not a world position
    pub offset: Vector3,
    pub seat: u8,
    pub time: u32,
}

impl TransportInfo {
    fn write(&self, w: &mut BitWriter) {
        w.write_packed_guid(self.guid);
        w.write_vector3(self.offset);
        w.write_u8(self.seat);
        w.write_u32(self.time);
    }

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            guid: r.read_packed_guid()?,
            offset: r.read_vector3()?,
            seat: r.read_u8()?,
            time: r.read_u32()?,
        })
    }
}

/// Shared movement state block
///
/// # Packet Format
/// ```text
/// bit            on transport
/// bit            has pitch (swimming or flying)
/// ----- flush
/// packed guid    mover
/// u32            movement flags
/// u32            client time (ms)
/// f32 f32 f32    position
/// f32            facing (radians)
/// [transport     packed guid, offset, u8 seat, u32 time]
/// [f32           pitch]
/// u32            fall time (ms)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MovementInfo {
    pub guid: Guid,
    pub flags: u32,
    pub time: u32,
    pub position: Vector3,
    pub facing: f32,
    pub transport: Option<TransportInfo>,
    pub pitch: Option<f32>,
    pub fall_time: u32,
}

impl MovementInfo {
    pub fn write(&self, w: &mut BitWriter) {
        w.write_bit(self.transport.is_some());
        w.write_bit(self.pitch.is_some());
        w.flush_bits();
        w.write_packed_guid(self.guid);
        w.write_u32(self.flags);
        w.write_u32(self.time);
        w.write_vector3(self.position);
        w.write_f32(self.facing);
        if let Some(transport) = &self.transport {
            transport.write(w);
        }
        if let Some(pitch) = self.pitch {
            w.write_f32(pitch);
        }
        w.write_u32(self.fall_time);
    }

    pub fn read(r: &mut BitReader) -> Result<Self> {
        let on_transport = r.read_bit()?;
        let has_pitch = r.read_bit()?;
        r.reset_bit_pos();
        let guid = r.read_packed_guid()?;
        let flags = r.read_u32()?;
        let time = r.read_u32()?;
        let position = r.read_vector3()?;
        let facing = r.read_f32()?;
        let transport = if on_transport {
            Some(TransportInfo::read(r)?)
        } else {
            None
        };
        let pitch = if has_pitch { Some(r.read_f32()?) } else { None };
        let fall_time = r.read_u32()?;
        Ok(Self {
            guid,
            flags,
            time,
            position,
            facing,
            transport,
            pitch,
            fall_time,
        })
    }
}

/// CMSG_MOVE_START_FORWARD - Player began moving forward
#[derive(Debug, Clone, PartialEq)]
pub struct CmsgMoveStartForward {
    pub info: MovementInfo,
}

impl CmsgMoveStartForward {
    pub fn write(&self, w: &mut BitWriter) {
        self.info.write(w);
    }
}

impl ClientMessage for CmsgMoveStartForward {
    const OPCODE: ClientOpcode = ClientOpcode::MoveStartForward;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            info: MovementInfo::read(r)?,
        })
    }
}

/// CMSG_MOVE_STOP - Player stopped moving
#[derive(Debug, Clone, PartialEq)]
pub struct CmsgMoveStop {
    pub info: MovementInfo,
}

impl CmsgMoveStop {
    pub fn write(&self, w: &mut BitWriter) {
        self.info.write(w);
    }
}

impl ClientMessage for CmsgMoveStop {
    const OPCODE: ClientOpcode = ClientOpcode::MoveStop;

    fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            info: MovementInfo::read(r)?,
        })
    }
}

/// SMSG_MOVE_UPDATE - Another unit's movement state, fanned out to
/// everyone who can see it
#[derive(Debug, Clone, PartialEq)]
pub struct SmsgMoveUpdate {
    pub info: MovementInfo,
}

impl SmsgMoveUpdate {
    pub fn read(r: &mut BitReader) -> Result<Self> {
        Ok(Self {
            info: MovementInfo::read(r)?,
        })
    }
}

impl ServerMessage for SmsgMoveUpdate {
    const OPCODE: ServerOpcode = ServerOpcode::MoveUpdate;
    const CHANNEL: Channel = Channel::Instance;

    fn write(&self, w: &mut BitWriter) {
        self.info.write(w);
    }
}
