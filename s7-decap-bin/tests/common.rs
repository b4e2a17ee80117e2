#![allow(dead_code)]

use etherparse::PacketBuilder;
use pcap_file::{
    pcap::{PcapHeader, PcapPacket, PcapWriter},
    DataLink,
};
use std::{fs::File, path::Path, sync::Once, time::Duration};
use tracing::Level;

pub const CLIENT: [u8; 4] = [10, 0, 0, 2];
pub const PLC: [u8; 4] = [10, 0, 0, 5];
pub const CLIENT_PORT: u16 = 49152;
pub const PLC_PORT: u16 = 102;

/// Job / ReadVar, pdu 1, DB1.DBB0, one byte
pub const READ_REQUEST: [u8; 24] = [
    0x32, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x0E, 0x00, 0x00, 0x04, 0x01, 0x12, 0x0A, 0x10, 0x02,
    0x00, 0x08, 0x00, 0x01, 0x84, 0x00, 0x00, 0x00,
];

/// Ack_Data / ReadVar, pdu 1, value 0x2a
pub const READ_RESPONSE: [u8; 19] = [
    0x32, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x00, 0x04, 0x01, 0xFF, 0x04,
    0x00, 0x08, 0x2A,
];

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

/// TPKT + COTP Data TPDU around an S7 telegram
pub fn iso_on_tcp(s7: &[u8]) -> Vec<u8> {
    let len = (7 + s7.len()) as u16;
    let mut payload = vec![0x03, 0x00, (len >> 8) as u8, len as u8, 0x02, 0xF0, 0x80];
    payload.extend_from_slice(s7);
    payload
}

pub fn tcp_frame(src: [u8; 4], dst: [u8; 4], src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 0x01], [0x02, 0, 0, 0, 0, 0x02])
        .ipv4(src, dst, 64)
        .tcp(src_port, dst_port, 1, 8192);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

pub fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 0x01], [0x02, 0, 0, 0, 0, 0x02])
        .ipv4(CLIENT, [10, 0, 0, 53], 64)
        .udp(53000, 53);
    let mut frame = Vec::new();
    builder.write(&mut frame, payload).unwrap();
    frame
}

/// DNS query, S7 read request, bare ACK, S7 read response, HTTP
pub fn plc_session() -> Vec<Vec<u8>> {
    vec![
        udp_frame(&[0xAB, 0xCD, 0x01, 0x00]),
        tcp_frame(CLIENT, PLC, CLIENT_PORT, PLC_PORT, &iso_on_tcp(&READ_REQUEST)),
        tcp_frame(PLC, CLIENT, PLC_PORT, CLIENT_PORT, &[]),
        tcp_frame(PLC, CLIENT, PLC_PORT, CLIENT_PORT, &iso_on_tcp(&READ_RESPONSE)),
        tcp_frame(CLIENT, [10, 0, 0, 80], 50000, 80, b"GET / HTTP/1.1\r\n\r\n"),
    ]
}

pub fn write_pcap(path: &Path, datalink: DataLink, frames: &[Vec<u8>]) {
    let file = File::create(path).unwrap();
    let header = PcapHeader {
        datalink,
        ..Default::default()
    };
    let mut writer = PcapWriter::with_header(file, header).unwrap();
    for (i, frame) in frames.iter().enumerate() {
        let packet = PcapPacket::new(Duration::from_millis(i as u64), frame.len() as u32, frame);
        writer.write_packet(&packet).unwrap();
    }
}
