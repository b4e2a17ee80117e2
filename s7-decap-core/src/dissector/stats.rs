use serde::Serialize;

/// Counters kept over one dissection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DissectorStats {
    /// Segments offered to the dissector, selected or not
    pub packets: usize,
    /// Segments that yielded a decoded telegram
    pub telegrams: usize,
    /// Segments that are not S7 ReadVar/WriteVar traffic
    pub skipped: usize,
    /// Segments recognised as S7 whose lengths do not fit the captured bytes
    pub malformed: usize,
    pub records: usize,
}
