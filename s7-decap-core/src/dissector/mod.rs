mod segment;
mod stats;

pub use segment::TcpSegment;
pub use stats::DissectorStats;

use crate::protocol::{
    error::{Error, Result},
    frame::{decapsulate, parse_telegram, S7AccessRecord, S7Telegram},
};
use tracing::{debug, info, trace};

/// Which packets of a capture are dissected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Stop after the first packet that yields a decoded telegram
    pub stop_after_first_match: bool,
    /// Dissect only the packet with this 0-based capture index
    pub only_packet_index: Option<usize>,
}

impl SelectionPolicy {
    pub fn first_match() -> Self {
        SelectionPolicy {
            stop_after_first_match: true,
            only_packet_index: None,
        }
    }

    pub fn packet(index: usize) -> Self {
        SelectionPolicy {
            stop_after_first_match: false,
            only_packet_index: Some(index),
        }
    }
}

/// Whether the caller should keep feeding segments.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Run all stages over one segment.
///
/// Records of the returned telegram carry the segment's capture index and
/// endpoints.
pub fn dissect_segment(segment: &TcpSegment) -> Result<S7Telegram> {
    let iso = decapsulate(&segment.payload, segment.src_port, segment.dst_port)?;
    let mut telegram = parse_telegram(iso.user_data)?;
    debug!(
        packet = segment.index,
        tpkt_len = iso.tpkt.length,
        cotp_li = iso.cotp.li,
        rosctr = telegram.header.rosctr.name(),
        pdu_ref = telegram.header.pdu_ref,
        param_len = telegram.header.param_len,
        data_len = telegram.header.data_len,
        items = telegram.records.len(),
        "S7 telegram decoded"
    );
    let (src, dst) = segment.endpoints();
    for record in telegram.records.iter_mut() {
        record.packet = Some(segment.index);
        record.src = src;
        record.dst = dst;
    }
    Ok(telegram)
}

/// Drives the dissection stages over segments in capture order and keeps the
/// records of every decoded telegram.
#[derive(Debug, Default)]
pub struct Dissector {
    policy: SelectionPolicy,
    records: Vec<S7AccessRecord>,
    stats: DissectorStats,
    finished: bool,
}

impl Dissector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Dissector {
            policy,
            ..Default::default()
        }
    }

    /// Offer the next segment. Returns [`Flow::Stop`] once the selection policy
    /// is satisfied; later segments are ignored.
    pub fn feed(&mut self, segment: &TcpSegment) -> Flow {
        if self.finished {
            return Flow::Stop;
        }
        self.stats.packets += 1;

        if let Some(wanted) = self.policy.only_packet_index {
            if segment.index < wanted {
                return Flow::Continue;
            }
            // Packet k has been seen (or skipped over): nothing more to select
            self.finished = true;
            if segment.index > wanted {
                return Flow::Stop;
            }
        }

        match dissect_segment(segment) {
            Ok(telegram) => {
                self.stats.telegrams += 1;
                self.stats.records += telegram.records.len();
                self.records.extend(telegram.records);
                if self.policy.stop_after_first_match {
                    self.finished = true;
                }
            }
            Err(e) => self.skip(segment, e),
        }

        if self.finished {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// Feed segments until exhausted or the selection policy stops the run.
    pub fn run<I>(&mut self, segments: I) -> DissectorStats
    where
        I: IntoIterator<Item = TcpSegment>,
    {
        for segment in segments {
            if self.feed(&segment) == Flow::Stop {
                break;
            }
        }
        self.finish()
    }

    /// Log the run summary and return the counters.
    pub fn finish(&self) -> DissectorStats {
        info!(
            packets = self.stats.packets,
            telegrams = self.stats.telegrams,
            skipped = self.stats.skipped,
            malformed = self.stats.malformed,
            records = self.stats.records,
            "Dissection finished"
        );
        self.stats
    }

    fn skip(&mut self, segment: &TcpSegment, e: Error) {
        if e.is_malformed() {
            self.stats.malformed += 1;
            debug!(packet = segment.index, "Malformed S7 telegram skipped: {}", e);
            return;
        }
        self.stats.skipped += 1;
        match e {
            Error::NotIsoOnTcp { .. } => trace!(packet = segment.index, "{}", e),
            _ => debug!(packet = segment.index, "Packet skipped: {}", e),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> DissectorStats {
        self.stats
    }

    pub fn records(&self) -> &[S7AccessRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<S7AccessRecord> {
        self.records
    }
}
