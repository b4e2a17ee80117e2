use super::super::error::{Error, Result};
use serde::Serialize;

/// COTP TPDU codes (high nibble of the TPDU type byte)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CotpType {
    /// Connection Request
    Cr = 0x0E,
    /// Connection Confirm
    Cc = 0x0D,
    /// Disconnection Request
    Dr = 0x08,
    /// Disconnection Confirm
    Dc = 0x0C,
    /// TPDU Error
    Er = 0x07,
    /// Data
    D = 0x0F,
}

impl TryFrom<u8> for CotpType {
    type Error = ();

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            0x0E => Ok(CotpType::Cr),
            0x0D => Ok(CotpType::Cc),
            0x08 => Ok(CotpType::Dr),
            0x0C => Ok(CotpType::Dc),
            0x07 => Ok(CotpType::Er),
            0x0F => Ok(CotpType::D),
            _ => Err(()),
        }
    }
}

/// ROSCTR: remote operation service control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rosctr {
    /// Request from the client
    Job,
    /// Response carrying data
    #[serde(rename = "Ack_Data")]
    AckData,
    /// Anything else; dissection stops here
    Unknown(u8),
}

impl Rosctr {
    /// S7 header length for this telegram kind, 0 when unsupported.
    pub fn header_len(self) -> usize {
        match self {
            Rosctr::Job => 10,
            Rosctr::AckData => 12,
            Rosctr::Unknown(_) => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rosctr::Job => "Job",
            Rosctr::AckData => "Ack_Data",
            Rosctr::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for Rosctr {
    fn from(v: u8) -> Self {
        match v {
            0x01 => Rosctr::Job,
            0x03 => Rosctr::AckData,
            other => Rosctr::Unknown(other),
        }
    }
}

/// S7 Function codes handled by the dissector
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum S7Function {
    /// Read Variable
    ReadVar = 0x04,
    /// Write Variable
    WriteVar = 0x05,
}

impl S7Function {
    pub fn name(self) -> &'static str {
        match self {
            S7Function::ReadVar => "ReadVar",
            S7Function::WriteVar => "WriteVar",
        }
    }
}

impl TryFrom<u8> for S7Function {
    type Error = ();

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            0x04 => Ok(S7Function::ReadVar),
            0x05 => Ok(S7Function::WriteVar),
            _ => Err(()),
        }
    }
}

/// Telegram variant: {Job, Ack_Data} x {ReadVar, WriteVar}.
///
/// The layout of the data section is fully determined by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramKind {
    /// Job / ReadVar: address list only, no data section
    ReadVarRequest,
    /// Ack_Data / ReadVar: one value item per requested variable
    ReadVarResponse,
    /// Job / WriteVar: address list followed by one value item per variable
    WriteVarRequest,
    /// Ack_Data / WriteVar: one status byte per variable
    WriteVarResponse,
}

impl TelegramKind {
    pub fn new(rosctr: Rosctr, function: S7Function) -> Result<Self> {
        match (rosctr, function) {
            (Rosctr::Job, S7Function::ReadVar) => Ok(TelegramKind::ReadVarRequest),
            (Rosctr::Job, S7Function::WriteVar) => Ok(TelegramKind::WriteVarRequest),
            (Rosctr::AckData, S7Function::ReadVar) => Ok(TelegramKind::ReadVarResponse),
            (Rosctr::AckData, S7Function::WriteVar) => Ok(TelegramKind::WriteVarResponse),
            (Rosctr::Unknown(v), _) => Err(Error::UnsupportedRosctr(v)),
        }
    }

    pub fn rosctr(self) -> Rosctr {
        match self {
            TelegramKind::ReadVarRequest | TelegramKind::WriteVarRequest => Rosctr::Job,
            TelegramKind::ReadVarResponse | TelegramKind::WriteVarResponse => Rosctr::AckData,
        }
    }

    pub fn function(self) -> S7Function {
        match self {
            TelegramKind::ReadVarRequest | TelegramKind::ReadVarResponse => S7Function::ReadVar,
            TelegramKind::WriteVarRequest | TelegramKind::WriteVarResponse => S7Function::WriteVar,
        }
    }
}

/// S7 ANY Syntax Identifier
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S7SyntaxId {
    /// Address data S7-Any pointer-like
    S7Any = 0x10,
}

/// S7 Memory/Area codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S7Area {
    /// System info of 200 family
    SI200 = 0x03,
    /// System flags of 200 family
    SF200 = 0x05,
    /// Analog inputs of 200 family
    AI200 = 0x06,
    /// Analog outputs of 200 family
    AO200 = 0x07,
    /// Direct peripheral access
    DP = 0x80,
    /// Inputs
    I = 0x81,
    /// Outputs
    O = 0x82,
    /// Merkers
    M = 0x83,
    /// Data Blocks (DB)
    DB = 0x84,
    /// Instance data blocks
    DI = 0x85,
    /// Local data
    L = 0x86,
    /// Previous local data
    V = 0x87,
    /// Counters
    C = 0x1C,
    /// Timers
    T = 0x1D,
    /// IEC counters of 200 family
    Iecc = 0x1E,
    ///IEC timers of 200 family
    Iecd = 0x1F,
}

impl S7Area {
    /// Mnemonic used in STEP 7 absolute addresses ("Q" for outputs, "P" for periphery)
    pub fn mnemonic(self) -> &'static str {
        match self {
            S7Area::SI200 => "SI",
            S7Area::SF200 => "SF",
            S7Area::AI200 => "AI",
            S7Area::AO200 => "AQ",
            S7Area::DP => "P",
            S7Area::I => "I",
            S7Area::O => "Q",
            S7Area::M => "M",
            S7Area::DB => "DB",
            S7Area::DI => "DI",
            S7Area::L => "L",
            S7Area::V => "V",
            S7Area::C => "C",
            S7Area::T => "T",
            S7Area::Iecc => "IEC_C",
            S7Area::Iecd => "IEC_T",
        }
    }
}

impl TryFrom<u8> for S7Area {
    type Error = ();
    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            0x03 => Ok(S7Area::SI200),
            0x05 => Ok(S7Area::SF200),
            0x06 => Ok(S7Area::AI200),
            0x07 => Ok(S7Area::AO200),
            0x80 => Ok(S7Area::DP),
            0x81 => Ok(S7Area::I),
            0x82 => Ok(S7Area::O),
            0x83 => Ok(S7Area::M),
            0x84 => Ok(S7Area::DB),
            0x85 => Ok(S7Area::DI),
            0x86 => Ok(S7Area::L),
            0x87 => Ok(S7Area::V),
            0x1C => Ok(S7Area::C),
            0x1D => Ok(S7Area::T),
            0x1E => Ok(S7Area::Iecc),
            0x1F => Ok(S7Area::Iecd),
            _ => Err(()),
        }
    }
}
