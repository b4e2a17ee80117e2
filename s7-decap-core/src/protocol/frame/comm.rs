use super::{
    super::error::{Error, Result},
    read_be_u16, read_u8,
    types::Rosctr,
    window,
};
use bytes::BufMut;

/// Magic byte opening every S7comm telegram
pub const S7_PROTOCOL_ID: u8 = 0x32;

/// S7 Header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S7Header {
    pub protocol_id: u8,
    pub rosctr: Rosctr,
    pub reserved: u16,
    pub pdu_ref: u16,
    pub param_len: u16,
    pub data_len: u16,
    /// Ack_Data only
    pub error_code: Option<u16>,
}

/// Section offsets derived from the header, relative to the telegram start.
///
/// Only computed, never checked here: the parameter and data stages validate
/// them against the telegram length when they read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelegramLayout {
    /// Function code position
    pub param_start: usize,
    /// First variable specification (Job only)
    pub param_item_start: usize,
    pub data_start: usize,
}

impl S7Header {
    /// Parse the S7 header from COTP user data.
    ///
    /// The header is 10 bytes for Job and 12 bytes for Ack_Data, any other
    /// ROSCTR is rejected before further bytes are read.
    pub fn parse(input: &[u8]) -> Result<(S7Header, TelegramLayout)> {
        let protocol_id = read_u8(input, 0)?;
        if protocol_id != S7_PROTOCOL_ID {
            return Err(Error::InvalidProtocolId(protocol_id));
        }
        let rosctr = Rosctr::from(read_u8(input, 1)?);
        let header_len = rosctr.header_len();
        if let Rosctr::Unknown(raw) = rosctr {
            return Err(Error::UnsupportedRosctr(raw));
        }
        window(input, 0, header_len)?;

        let error_code = match rosctr {
            Rosctr::AckData => Some(read_be_u16(input, 10)?),
            _ => None,
        };
        let header = S7Header {
            protocol_id,
            rosctr,
            reserved: read_be_u16(input, 2)?,
            pdu_ref: read_be_u16(input, 4)?,
            param_len: read_be_u16(input, 6)?,
            data_len: read_be_u16(input, 8)?,
            error_code,
        };
        let layout = TelegramLayout {
            param_start: header_len,
            param_item_start: header_len + 2,
            data_start: header_len + header.param_len as usize,
        };
        Ok((header, layout))
    }

    /// Encode the header; the error code is written for Ack_Data only.
    pub fn encode_to<B: BufMut>(&self, dst: &mut B) {
        let rosctr = match self.rosctr {
            Rosctr::Job => 0x01,
            Rosctr::AckData => 0x03,
            Rosctr::Unknown(raw) => raw,
        };
        dst.put_u8(self.protocol_id);
        dst.put_u8(rosctr);
        dst.put_u16(self.reserved);
        dst.put_u16(self.pdu_ref);
        dst.put_u16(self.param_len);
        dst.put_u16(self.data_len);
        if self.rosctr == Rosctr::AckData {
            dst.put_u16(self.error_code.unwrap_or_default());
        }
    }
}
