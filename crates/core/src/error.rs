//! Core error types for the wire-format layer

/// Errors produced while decoding or encoding protocol messages.
///
/// Decode errors are local to one packet: the connection layer drops the
/// packet and reports the failure, it never retries a partial read.
#[derive(thiserror::Error, Debug)]
pub enum WireError {
    #[error("buffer underrun: needed {needed} more byte(s), {remaining} remaining")]
    Underrun { needed: usize, remaining: usize },

    #[error("invalid UTF-8 in string field: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unknown opcode: {0:#06x}")]
    UnknownOpcode(u16),

    #[error("timestamp out of packed-time range: {0}")]
    TimeOutOfRange(i64),

    #[error("malformed packet: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
