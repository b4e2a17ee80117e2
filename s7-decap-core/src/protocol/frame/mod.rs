pub mod comm;
pub mod cotp;
pub mod param;
pub mod payload;
pub mod record;
pub mod tpkt;
pub mod types;

use super::error::{Error, Result};
use nom::number::complete::{be_u16, u8 as nom_u8};

pub use comm::{S7Header, TelegramLayout, S7_PROTOCOL_ID};
pub use cotp::{decapsulate, CotpHeader, IsoPayload, ISO_TCP_PORT};
pub use param::{parse_param_items, S7VarSpec};
pub use payload::{parse_payload_items, VarPayloadItem};
pub use record::{S7AccessRecord, S7AnyAddress};
pub use tpkt::Tpkt;
pub use types::{CotpType, Rosctr, S7Area, S7Function, S7SyntaxId, TelegramKind};

/// One decoded S7 telegram: header plus one record per declared item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S7Telegram {
    pub header: S7Header,
    pub kind: TelegramKind,
    pub records: Vec<S7AccessRecord>,
}

/// Run header validation, parameter and data stages over COTP user data.
///
/// The records returned own every byte they carry; nothing borrows `user_data`.
pub fn parse_telegram(user_data: &[u8]) -> Result<S7Telegram> {
    let (header, layout) = S7Header::parse(user_data)?;
    let (kind, mut records, _params_end) = parse_param_items(user_data, &header, &layout)?;
    let _data_end = parse_payload_items(user_data, kind, layout.data_start, &mut records)?;
    Ok(S7Telegram {
        header,
        kind,
        records,
    })
}

/// Bounds-checked view of `input[offset..offset + len]`.
pub(crate) fn window(input: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| input.get(offset..end))
        .ok_or(Error::InsufficientData {
            offset,
            needed: len,
            available: input.len().saturating_sub(offset),
        })
}

pub(crate) fn read_u8(input: &[u8], offset: usize) -> Result<u8> {
    let (_, v) = nom_u8::<_, nom::error::Error<&[u8]>>(window(input, offset, 1)?)
        .map_err(|_| Error::ProtocolViolation {
            context: "u8 read",
        })?;
    Ok(v)
}

pub(crate) fn read_be_u16(input: &[u8], offset: usize) -> Result<u16> {
    let (_, v) = be_u16::<_, nom::error::Error<&[u8]>>(window(input, offset, 2)?).map_err(
        |_| Error::ProtocolViolation {
            context: "u16 read",
        },
    )?;
    Ok(v)
}
