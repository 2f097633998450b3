//! Opcode enumerations and connection-channel tags
//!
//! Opcodes identify message types on the wire. The dispatch table that
//! maps an incoming opcode to a handler lives in the session layer; this
//! module only defines the identities and their numeric values.
//!
//! ## Naming Convention
//!
//! - `ClientOpcode` = client-to-server messages (CMSG)
//! - `ServerOpcode` = server-to-client messages (SMSG)

/// Transport channel a server message is routed over
///
/// Routing metadata for the connection layer; never serialized into the
/// payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Realm-wide connection (characters, guilds, chat, calendar)
    Realm,
    /// Map-instance connection (movement, combat, world state)
    Instance,
}

/// Opcode enumeration for all client-to-server messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ClientOpcode {
    //=== Characters ===//
    /// Create a new character on the realm
    CharCreate = 0x0036,
    /// Request the character list for the account
    CharEnum = 0x0037,
    /// Delete a character
    CharDelete = 0x0038,
    /// Enter the world with a selected character
    PlayerLogin = 0x003D,

    //=== Guilds ===//
    /// Look up a guild's name, ranks and emblem
    GuildQuery = 0x0054,

    //=== Chat ===//
    /// Send a chat message
    MessageChat = 0x0095,

    //=== Movement ===//
    /// Player started moving forward
    MoveStartForward = 0x00B5,
    /// Player stopped moving
    MoveStop = 0x00B7,

    //=== Session ===//
    /// Keepalive ping with client-measured latency
    Ping = 0x01DC,
    /// Open the session after the auth challenge
    AuthSession = 0x01ED,

    //=== Calendar ===//
    /// Request the full calendar snapshot
    CalendarGetCalendar = 0x0429,
}

impl ClientOpcode {
    /// Map a raw opcode value to a known client message type
    ///
    /// Returns `None` for opcodes this catalog does not define; the
    /// session layer turns that into an unknown-opcode failure.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0036 => Some(ClientOpcode::CharCreate),
            0x0037 => Some(ClientOpcode::CharEnum),
            0x0038 => Some(ClientOpcode::CharDelete),
            0x003D => Some(ClientOpcode::PlayerLogin),
            0x0054 => Some(ClientOpcode::GuildQuery),
            0x0095 => Some(ClientOpcode::MessageChat),
            0x00B5 => Some(ClientOpcode::MoveStartForward),
            0x00B7 => Some(ClientOpcode::MoveStop),
            0x01DC => Some(ClientOpcode::Ping),
            0x01ED => Some(ClientOpcode::AuthSession),
            0x0429 => Some(ClientOpcode::CalendarGetCalendar),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Opcode enumeration for all server-to-client messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ServerOpcode {
    //=== Characters ===//
    /// Character list for the account selection screen
    CharEnum = 0x003B,

    //=== Guilds ===//
    /// Guild name, ranks and emblem for a queried guild
    GuildQueryResponse = 0x0055,
    /// Full member roster of the player's guild
    GuildRoster = 0x008A,

    //=== Chat ===//
    /// Chat message fan-out to nearby or channel members
    MessageChat = 0x0096,

    //=== Movement ===//
    /// Another unit's movement state changed
    MoveUpdate = 0x00DD,

    //=== Trade & Items ===//
    /// Trade window state transition
    TradeStatus = 0x0120,
    /// Item arrived in the player's bags (loot, mail, quest reward)
    ItemPushResult = 0x0166,

    //=== Session ===//
    /// Keepalive reply echoing the ping sequence
    Pong = 0x01DD,
    /// Session accepted, queued, or rejected
    AuthResponse = 0x01EE,

    //=== Calendar ===//
    /// Full calendar snapshot (events and pending invites)
    CalendarSendCalendar = 0x0436,
    /// A new calendar invite arrived while online
    CalendarEventInviteAlert = 0x0440,
}

impl ServerOpcode {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x003B => Some(ServerOpcode::CharEnum),
            0x0055 => Some(ServerOpcode::GuildQueryResponse),
            0x008A => Some(ServerOpcode::GuildRoster),
            0x0096 => Some(ServerOpcode::MessageChat),
            0x00DD => Some(ServerOpcode::MoveUpdate),
            0x0120 => Some(ServerOpcode::TradeStatus),
            0x0166 => Some(ServerOpcode::ItemPushResult),
            0x01DD => Some(ServerOpcode::Pong),
            0x01EE => Some(ServerOpcode::AuthResponse),
            0x0436 => Some(ServerOpcode::CalendarSendCalendar),
            0x0440 => Some(ServerOpcode::CalendarEventInviteAlert),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}
