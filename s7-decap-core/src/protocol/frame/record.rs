use super::types::{Rosctr, S7Area, S7Function};
use serde::{Serialize, Serializer};
use std::{fmt, net::SocketAddr};

/// Transport size code for single-bit access
const TRANSPORT_SIZE_BIT: u8 = 0x01;

/// 3-byte S7Any address: byte offset in the high 21 bits, bit number in the low 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct S7AnyAddress(pub [u8; 3]);

impl S7AnyAddress {
    pub fn raw(self) -> u32 {
        u32::from_be_bytes([0, self.0[0], self.0[1], self.0[2]])
    }

    pub fn byte_offset(self) -> u32 {
        self.raw() >> 3
    }

    pub fn bit(self) -> u8 {
        (self.raw() & 0x07) as u8
    }
}

impl fmt::Display for S7AnyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl Serialize for S7AnyAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One variable access: a single item of a ReadVar/WriteVar telegram.
///
/// The parameter stage fills the addressing fields, the data stage the value
/// fields. Everything is owned so records outlive the packet buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S7AccessRecord {
    /// Capture index of the packet carrying the telegram
    pub packet: Option<usize>,
    pub src: Option<SocketAddr>,
    pub dst: Option<SocketAddr>,
    pub function: S7Function,
    pub rosctr: Rosctr,
    pub pdu_ref: u16,
    /// 0-based item index within the telegram
    pub item: usize,
    pub status: Option<u8>,
    pub dbid: Option<u16>,
    pub area: Option<u8>,
    pub trsize: Option<u8>,
    pub address: Option<S7AnyAddress>,
    /// Length in bytes (wire carries bits)
    pub objlen: Option<usize>,
    /// Value bytes, lowercase hex
    pub data: String,
}

impl S7AccessRecord {
    pub fn new(function: S7Function, rosctr: Rosctr, pdu_ref: u16, item: usize) -> Self {
        S7AccessRecord {
            packet: None,
            src: None,
            dst: None,
            function,
            rosctr,
            pdu_ref,
            item,
            status: None,
            dbid: None,
            area: None,
            trsize: None,
            address: None,
            objlen: None,
            data: String::new(),
        }
    }

    /// STEP 7 style absolute address, e.g. `DB1.DBB0`, `DB1.DBX0.1`, `MB2`, `M2.3`.
    ///
    /// `None` until the parameter stage has seen the variable specification.
    pub fn location(&self) -> Option<String> {
        let (area, address) = (self.area?, self.address?);
        let bit = self.trsize == Some(TRANSPORT_SIZE_BIT);
        let (byte, bit_nr) = (address.byte_offset(), address.bit());
        let location = match S7Area::try_from(area) {
            Ok(area @ (S7Area::DB | S7Area::DI)) => {
                let block = area.mnemonic();
                let db = self.dbid.unwrap_or_default();
                if bit {
                    format!("{block}{db}.{block}X{byte}.{bit_nr}")
                } else {
                    format!("{block}{db}.{block}B{byte}")
                }
            }
            Ok(area) if bit => format!("{}{byte}.{bit_nr}", area.mnemonic()),
            Ok(area) => format!("{}B{byte}", area.mnemonic()),
            Err(()) => format!("area{area:#04x}:{address}"),
        };
        Some(location)
    }
}

impl fmt::Display for S7AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(packet) = self.packet {
            write!(f, "#{packet} ")?;
        }
        if let (Some(src), Some(dst)) = (self.src, self.dst) {
            write!(f, "{src} -> {dst} ")?;
        }
        write!(
            f,
            "{} {} pdu={} item={}",
            self.rosctr.name(),
            self.function.name(),
            self.pdu_ref,
            self.item
        )?;
        if let Some(location) = self.location() {
            write!(f, " {location}")?;
        }
        if let Some(area) = self.area {
            write!(f, " area={area:#04x}")?;
        }
        if let Some(trsize) = self.trsize {
            write!(f, " trsize={trsize}")?;
        }
        if let Some(objlen) = self.objlen {
            write!(f, " len={objlen}")?;
        }
        if let Some(status) = self.status {
            write!(f, " status={status:#04x}")?;
        }
        write!(f, " data={}", self.data)
    }
}
