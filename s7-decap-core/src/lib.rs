//! S7comm variable access extraction.
//!
//! Peels TPKT and COTP off ISO-on-TCP segments, validates the S7 header and
//! decodes ReadVar/WriteVar telegrams into [`S7AccessRecord`]s, one per item.
//! [`Dissector`] drives the stages over a sequence of [`TcpSegment`]s and
//! applies the packet selection policy.

pub mod dissector;
pub mod protocol;

pub use dissector::{dissect_segment, Dissector, DissectorStats, Flow, SelectionPolicy, TcpSegment};
pub use protocol::{
    frame::{parse_telegram, S7AccessRecord, S7AnyAddress, S7Telegram, TelegramKind},
    S7Error, S7Result,
};
