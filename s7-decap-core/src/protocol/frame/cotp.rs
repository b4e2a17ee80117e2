use super::{
    super::error::{Error, Result},
    read_u8,
    tpkt::{Tpkt, TPKT_HEADER_LEN},
    types::CotpType,
    window,
};
use tracing::debug;

/// Well-known ISO-on-TCP (RFC1006) port used by S7 PLCs
pub const ISO_TCP_PORT: u16 = 102;

/// COTP header as found after the TPKT header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CotpHeader {
    /// Length indicator: header bytes following the LI byte itself
    pub li: u8,
    /// TPDU code (high nibble of the type byte)
    pub code: u8,
    /// End-of-transmission flag, Data TPDUs only
    pub eot: Option<bool>,
}

impl CotpHeader {
    /// Parse the COTP header whose LI byte sits at `offset`.
    ///
    /// Returns the header and the offset of the first user-data byte.
    pub fn parse(input: &[u8], offset: usize) -> Result<(Self, usize)> {
        let li = read_u8(input, offset)?;
        if li == 0 {
            return Err(Error::ProtocolViolation {
                context: "COTP length indicator is zero",
            });
        }
        let header = window(input, offset + 1, li as usize)?;
        let code = header[0] >> 4;
        let eot = match (CotpType::try_from(code), header.get(1)) {
            (Ok(CotpType::D), Some(eot_nr)) => Some(eot_nr & 0x80 != 0),
            _ => None,
        };
        Ok((CotpHeader { li, code, eot }, offset + 1 + li as usize))
    }

    pub fn tpdu_type(&self) -> Option<CotpType> {
        CotpType::try_from(self.code).ok()
    }
}

/// ISO-on-TCP layers peeled off one TCP payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoPayload<'a> {
    pub tpkt: Tpkt,
    pub cotp: CotpHeader,
    /// COTP user data: the candidate S7 telegram
    pub user_data: &'a [u8],
}

/// Strip TPKT and COTP from a TCP payload and return the Data TPDU user data.
///
/// The payload qualifies only when one of the ports is [`ISO_TCP_PORT`] and the
/// COTP TPDU is a Data TPDU.
pub fn decapsulate(payload: &[u8], src_port: u16, dst_port: u16) -> Result<IsoPayload<'_>> {
    if src_port != ISO_TCP_PORT && dst_port != ISO_TCP_PORT {
        return Err(Error::NotIsoOnTcp { src_port, dst_port });
    }
    let tpkt = Tpkt::peek(payload)?;
    let (cotp, user_start) = CotpHeader::parse(payload, TPKT_HEADER_LEN)?;
    debug!(
        tpkt_version = tpkt.version,
        tpkt_len = tpkt.length,
        rfc1006 = tpkt.is_rfc1006(),
        cotp_li = cotp.li,
        cotp_code = cotp.code,
        eot = ?cotp.eot,
        "ISO-on-TCP headers"
    );
    if cotp.tpdu_type() != Some(CotpType::D) {
        return Err(Error::NotCotpData { code: cotp.code });
    }
    let user_data = payload
        .get(user_start..)
        .ok_or(Error::ProtocolViolation {
            context: "COTP header overruns payload",
        })?;
    Ok(IsoPayload {
        tpkt,
        cotp,
        user_data,
    })
}
