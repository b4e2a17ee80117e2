#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use s7_decap_core::protocol::frame::{Rosctr, S7Header, S7_PROTOCOL_ID};
use std::sync::Once;
use tracing::Level;

/// Global one-time tracing initialization guard for dissector tests.
static INIT_TRACING: Once = Once::new();

/// Install a compact `DEBUG` subscriber so skip reasons show up with `--nocapture`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

/// S7Any variable specification used by Job telegrams
#[derive(Debug, Clone, Copy)]
pub struct VarItem {
    pub trsize: u8,
    pub bit_len: u16,
    pub db: u16,
    pub area: u8,
    pub address: [u8; 3],
}

impl VarItem {
    /// One byte of DB `db` at byte offset `byte`
    pub fn db_byte(db: u16, byte: u32) -> Self {
        let raw = (byte << 3).to_be_bytes();
        VarItem {
            trsize: 0x02,
            bit_len: 8,
            db,
            area: 0x84,
            address: [raw[1], raw[2], raw[3]],
        }
    }

    fn encode_to(&self, dst: &mut BytesMut) {
        dst.put_u8(0x12);
        dst.put_u8(0x0A);
        dst.put_u8(0x10);
        dst.put_u8(self.trsize);
        dst.put_u16(self.bit_len);
        dst.put_u16(self.db);
        dst.put_u8(self.area);
        dst.put_slice(&self.address);
    }
}

/// Value item of a data section; `bit_len` is written as given
#[derive(Debug, Clone)]
pub struct DataItem {
    pub status: u8,
    pub trsize: u8,
    pub bit_len: u16,
    pub data: Vec<u8>,
}

impl DataItem {
    pub fn bytes(status: u8, data: &[u8]) -> Self {
        DataItem {
            status,
            trsize: 0x04,
            bit_len: (data.len() * 8) as u16,
            data: data.to_vec(),
        }
    }

    fn encode_to(&self, dst: &mut BytesMut) {
        dst.put_u8(self.status);
        dst.put_u8(self.trsize);
        dst.put_u16(self.bit_len);
        dst.put_slice(&self.data);
    }
}

fn telegram(rosctr: Rosctr, pdu_ref: u16, param: &[u8], data: &[u8]) -> Vec<u8> {
    let header = S7Header {
        protocol_id: S7_PROTOCOL_ID,
        rosctr,
        reserved: 0,
        pdu_ref,
        param_len: param.len() as u16,
        data_len: data.len() as u16,
        error_code: (rosctr == Rosctr::AckData).then_some(0),
    };
    let mut buf = BytesMut::new();
    header.encode_to(&mut buf);
    buf.put_slice(param);
    buf.put_slice(data);
    buf.to_vec()
}

fn job_param(function: u8, items: &[VarItem]) -> BytesMut {
    let mut param = BytesMut::new();
    param.put_u8(function);
    param.put_u8(items.len() as u8);
    for item in items {
        item.encode_to(&mut param);
    }
    param
}

pub fn job_read_var(pdu_ref: u16, items: &[VarItem]) -> Vec<u8> {
    telegram(Rosctr::Job, pdu_ref, &job_param(0x04, items), &[])
}

pub fn job_write_var(pdu_ref: u16, items: &[(VarItem, DataItem)]) -> Vec<u8> {
    let specs: Vec<VarItem> = items.iter().map(|(spec, _)| *spec).collect();
    let mut data = BytesMut::new();
    for (_, value) in items {
        value.encode_to(&mut data);
    }
    telegram(Rosctr::Job, pdu_ref, &job_param(0x05, &specs), &data)
}

pub fn ack_read_var(pdu_ref: u16, values: &[DataItem]) -> Vec<u8> {
    let mut data = BytesMut::new();
    for value in values {
        value.encode_to(&mut data);
    }
    telegram(
        Rosctr::AckData,
        pdu_ref,
        &[0x04, values.len() as u8],
        &data,
    )
}

pub fn ack_write_var(pdu_ref: u16, statuses: &[u8]) -> Vec<u8> {
    telegram(
        Rosctr::AckData,
        pdu_ref,
        &[0x05, statuses.len() as u8],
        statuses,
    )
}

/// Wrap an S7 telegram in TPKT and a COTP Data TPDU.
pub fn iso_on_tcp(s7: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u8(0x03);
    buf.put_u8(0x00);
    buf.put_u16((7 + s7.len()) as u16);
    buf.put_slice(&[0x02, 0xF0, 0x80]);
    buf.put_slice(s7);
    buf.to_vec()
}
