use bytes::Bytes;
use std::net::{IpAddr, SocketAddr};

/// One TCP segment handed over by the capture collaborator.
///
/// The payload is owned so segments can be queued ahead of the dissector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSegment {
    /// 0-based position of the packet in the capture
    pub index: usize,
    pub src: Option<IpAddr>,
    pub dst: Option<IpAddr>,
    pub src_port: u16,
    pub dst_port: u16,
    pub payload: Bytes,
}

impl TcpSegment {
    pub fn new(index: usize, src_port: u16, dst_port: u16, payload: impl Into<Bytes>) -> Self {
        TcpSegment {
            index,
            src: None,
            dst: None,
            src_port,
            dst_port,
            payload: payload.into(),
        }
    }

    pub fn with_endpoints(mut self, src: IpAddr, dst: IpAddr) -> Self {
        self.src = Some(src);
        self.dst = Some(dst);
        self
    }

    /// Source and destination socket addresses, when the IP layer is known.
    pub fn endpoints(&self) -> (Option<SocketAddr>, Option<SocketAddr>) {
        (
            self.src.map(|ip| SocketAddr::new(ip, self.src_port)),
            self.dst.map(|ip| SocketAddr::new(ip, self.dst_port)),
        )
    }
}
