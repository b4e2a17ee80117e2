use crate::error::{DecapError, DecapResult};
use bytes::Bytes;
use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_file::{pcap::PcapReader, DataLink};
use s7_decap_core::TcpSegment;
use std::{
    fs::File,
    io::{BufReader, Read},
    net::IpAddr,
    path::Path,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, trace};

/// Link layers the capture reader can peel down to IP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Ethernet,
    /// Packets start directly with an IPv4 or IPv6 header
    RawIp,
}

impl TryFrom<DataLink> for LinkKind {
    type Error = DecapError;

    fn try_from(datalink: DataLink) -> Result<Self, Self::Error> {
        match datalink {
            DataLink::ETHERNET => Ok(LinkKind::Ethernet),
            DataLink::RAW | DataLink::IPV4 | DataLink::IPV6 => Ok(LinkKind::RawIp),
            other => Err(DecapError::UnsupportedLinkType(format!("{other:?}"))),
        }
    }
}

/// Classic pcap reader yielding the TCP segments of a capture in order.
///
/// Every record read advances the capture index, whether it is forwarded or
/// not, so indices match the packet numbering of other capture tools (0-based).
pub struct PcapSource<R: Read> {
    reader: PcapReader<R>,
    link: LinkKind,
    index: usize,
}

impl PcapSource<BufReader<File>> {
    pub fn open(path: &Path) -> DecapResult<Self> {
        let file = File::open(path).map_err(|source| DecapError::OpenCapture {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> PcapSource<R> {
    pub fn new(reader: R) -> DecapResult<Self> {
        let reader = PcapReader::new(reader)?;
        let link = LinkKind::try_from(reader.header().datalink)?;
        Ok(PcapSource {
            reader,
            link,
            index: 0,
        })
    }

    pub fn link(&self) -> LinkKind {
        self.link
    }
}

impl<R: Read> Iterator for PcapSource<R> {
    type Item = DecapResult<TcpSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let packet = match self.reader.next_packet()? {
                Ok(packet) => packet,
                Err(e) => return Some(Err(e.into())),
            };
            let index = self.index;
            self.index += 1;
            if let Some(segment) = tcp_segment(self.link, index, &packet.data) {
                return Some(Ok(segment));
            }
        }
    }
}

/// Decode one link-layer frame down to its TCP payload.
///
/// Frames that are not TCP, or TCP segments without payload, yield `None`.
pub fn tcp_segment(link: LinkKind, index: usize, frame: &[u8]) -> Option<TcpSegment> {
    let sliced = match link {
        LinkKind::Ethernet => SlicedPacket::from_ethernet(frame),
        LinkKind::RawIp => SlicedPacket::from_ip(frame),
    };
    let sliced = match sliced {
        Ok(sliced) => sliced,
        Err(e) => {
            trace!(packet = index, "Undecodable frame: {}", e);
            return None;
        }
    };
    let tcp = match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => tcp,
        _ => return None,
    };
    if tcp.payload().is_empty() {
        return None;
    }
    let endpoints = match &sliced.net {
        Some(NetSlice::Ipv4(ip)) => Some((
            IpAddr::V4(ip.header().source_addr()),
            IpAddr::V4(ip.header().destination_addr()),
        )),
        Some(NetSlice::Ipv6(ip)) => Some((
            IpAddr::V6(ip.header().source_addr()),
            IpAddr::V6(ip.header().destination_addr()),
        )),
        _ => None,
    };
    let segment = TcpSegment::new(
        index,
        tcp.source_port(),
        tcp.destination_port(),
        Bytes::copy_from_slice(tcp.payload()),
    );
    Some(match endpoints {
        Some((src, dst)) => segment.with_endpoints(src, dst),
        None => segment,
    })
}

/// Read the capture on a blocking worker, feeding a bounded queue.
///
/// The worker returns the number of segments forwarded. It exits early, without
/// error, once the receiver is dropped.
pub fn spawn_capture<R>(
    source: PcapSource<R>,
    depth: usize,
) -> (mpsc::Receiver<TcpSegment>, JoinHandle<DecapResult<usize>>)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(depth.max(1));
    let handle = tokio::task::spawn_blocking(move || {
        let mut forwarded = 0;
        for segment in source {
            if tx.blocking_send(segment?).is_err() {
                debug!(forwarded, "Dissector done, capture reader exits");
                break;
            }
            forwarded += 1;
        }
        Ok(forwarded)
    });
    (rx, handle)
}
