//! Packet catalog
//!
//! One module per protocol area. Each message type is a plain struct
//! whose `read`/`write` sequence the exact codec calls its wire shape
//! prescribes; the call order, every bit width, and the position of
//! every `flush_bits`/`reset_bit_pos` are the compatibility contract
//! with the real client.
//!
//! Client messages implement [`crate::message::ClientMessage`] and
//! server messages [`crate::message::ServerMessage`]. Both directions
//! are implemented for every shape so round-trips are testable end to
//! end, even where only one direction runs in production.

pub mod auth;
pub mod calendar;
pub mod character;
pub mod chat;
pub mod guild;
pub mod item;
pub mod movement;

pub use auth::*;
pub use calendar::*;
pub use character::*;
pub use chat::*;
pub use guild::*;
pub use item::*;
pub use movement::*;
