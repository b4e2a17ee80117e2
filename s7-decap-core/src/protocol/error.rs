use std::result::Result as StdResult;
use thiserror::Error as ThisError;

/// Unified dissection result type
pub type Result<T> = StdResult<T, Error>;

/// Reasons a TCP payload does not yield an S7 telegram.
///
/// Every variant is recoverable: the caller skips the packet and continues with
/// the next one. [`Error::is_malformed`] separates payloads that are simply not
/// S7comm from payloads that claim to be S7comm but do not hold together.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Neither TCP port is the ISO-on-TCP port
    #[error("not an ISO-on-TCP segment (ports {src_port} -> {dst_port})")]
    NotIsoOnTcp { src_port: u16, dst_port: u16 },

    /// COTP TPDU other than Data (connect, disconnect, reject...)
    #[error("COTP TPDU {code:#03x} carries no user data")]
    NotCotpData { code: u8 },

    #[error("invalid protocol id: expected 0x32, got {0:#04x}")]
    InvalidProtocolId(u8),

    /// ROSCTR other than Job or Ack_Data
    #[error("unsupported ROSCTR {0:#04x}")]
    UnsupportedRosctr(u8),

    /// Function other than ReadVar or WriteVar
    #[error("unsupported function {0:#04x}")]
    UnsupportedFunction(u8),

    /// Variable specification that is not a 10-byte S7Any address
    #[error("unsupported addressing mode: syntax id {syntax_id:#04x}, address length {addr_len}")]
    UnsupportedAddressing { syntax_id: u8, addr_len: u8 },

    /// A declared length or offset points past the end of the buffer
    #[error("insufficient data at offset {offset}: needed {needed} bytes, available {available} bytes")]
    InsufficientData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Protocol contract violated (e.g., reserved/invalid field values)
    #[error("protocol violation: {context}")]
    ProtocolViolation { context: &'static str },
}

impl Error {
    /// `true` when the payload was recognised as ISO-on-TCP / S7 but its
    /// internal lengths do not fit the bytes actually captured.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData { .. } | Error::ProtocolViolation { .. }
        )
    }
}
