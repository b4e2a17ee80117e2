use super::{super::error::Result, read_be_u16, read_u8};

/// Length of the RFC1006 TPKT header preceding the COTP TPDU
pub const TPKT_HEADER_LEN: usize = 4;

/// TPKT (RFC1006) header: 4 bytes
///
/// ISO-on-TCP is identified by port, so these fields are reported as seen on the
/// wire and never validated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tpkt {
    /// 0x03 for RFC1006
    pub version: u8,
    /// Reserved, 0x00
    pub reserved: u8,
    /// Total length including this 4-byte header
    pub length: u16,
}

impl Tpkt {
    /// Read the TPKT header at the start of a TCP payload.
    pub fn peek(input: &[u8]) -> Result<Self> {
        Ok(Tpkt {
            version: read_u8(input, 0)?,
            reserved: read_u8(input, 1)?,
            length: read_be_u16(input, 2)?,
        })
    }

    /// Whether the header looks like RFC1006 (version 3, reserved 0).
    pub fn is_rfc1006(&self) -> bool {
        self.version == 0x03 && self.reserved == 0x00
    }
}
