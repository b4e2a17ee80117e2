use super::{
    super::error::{Error, Result},
    comm::{S7Header, TelegramLayout},
    read_u8,
    record::{S7AccessRecord, S7AnyAddress},
    types::{Rosctr, S7Function, S7SyntaxId, TelegramKind},
    window,
};
use nom::{
    bytes::complete::take,
    number::complete::{be_u16, u8 as nom_u8},
    sequence::tuple,
};
use tracing::trace;

/// Address length of an S7Any variable specification
pub const S7ANY_ADDR_LEN: u8 = 0x0A;

/// Variable specification (Job parameter item)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S7VarSpec {
    /// Specification type, 0x12 for "variable specification"
    pub spec_type: u8,
    pub addr_len: u8,
    pub syntax_id: u8,
    pub transport_size: u8,
    /// Requested length as carried on the wire (bits)
    pub bit_len: u16,
    pub db_number: u16,
    pub area: u8,
    pub address: S7AnyAddress,
}

impl S7VarSpec {
    pub fn objlen(&self) -> usize {
        (self.bit_len >> 3) as usize
    }

    /// Copy the addressing fields into the record for the same item.
    pub fn apply_to(&self, record: &mut S7AccessRecord) {
        record.trsize = Some(self.transport_size);
        record.objlen = Some(self.objlen());
        record.dbid = Some(self.db_number);
        record.area = Some(self.area);
        record.address = Some(self.address);
    }
}

/// Parse the variable specification starting at `cursor`.
///
/// Returns the variable specification and the cursor advanced by `2 + addr_len`.
pub fn parse_var_spec(input: &[u8], cursor: usize) -> Result<(S7VarSpec, usize)> {
    let addr_len = read_u8(input, cursor + 1)?;
    let syntax_id = read_u8(input, cursor + 2)?;
    if addr_len != S7ANY_ADDR_LEN || syntax_id != S7SyntaxId::S7Any as u8 {
        return Err(Error::UnsupportedAddressing {
            syntax_id,
            addr_len,
        });
    }
    let item_len = 2 + addr_len as usize;
    let item = window(input, cursor, item_len)?;
    let (_, (spec_type, _, _, transport_size, bit_len, db_number, area, address)) = tuple((
        nom_u8,
        nom_u8,
        nom_u8,
        nom_u8,
        be_u16,
        be_u16,
        nom_u8,
        take(3usize),
    ))(item)
    .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| Error::ProtocolViolation {
        context: "variable specification",
    })?;
    let address = <[u8; 3]>::try_from(address).map_err(|_| Error::ProtocolViolation {
        context: "S7Any address",
    })?;
    Ok((
        S7VarSpec {
            spec_type,
            addr_len,
            syntax_id,
            transport_size,
            bit_len,
            db_number,
            area,
            address: S7AnyAddress(address),
        },
        cursor + item_len,
    ))
}

/// Parameter stage: function code, item count and, for Job telegrams, the
/// variable specification list.
///
/// Produces one record per declared item, pre-filled with function, ROSCTR,
/// PDU reference and item index. Returns the cursor past the last parsed spec.
pub fn parse_param_items(
    input: &[u8],
    header: &S7Header,
    layout: &TelegramLayout,
) -> Result<(TelegramKind, Vec<S7AccessRecord>, usize)> {
    let raw_function = read_u8(input, layout.param_start)?;
    let function =
        S7Function::try_from(raw_function).map_err(|_| Error::UnsupportedFunction(raw_function))?;
    let kind = TelegramKind::new(header.rosctr, function)?;
    let item_count = read_u8(input, layout.param_start + 1)? as usize;

    let mut records: Vec<S7AccessRecord> = (0..item_count)
        .map(|item| S7AccessRecord::new(function, header.rosctr, header.pdu_ref, item))
        .collect();

    let mut cursor = layout.param_item_start;
    if kind.rosctr() == Rosctr::Job {
        for record in records.iter_mut() {
            let (spec, next) = parse_var_spec(input, cursor)?;
            spec.apply_to(record);
            cursor = next;
        }
        if cursor != layout.data_start {
            trace!(
                cursor,
                data_start = layout.data_start,
                "parameter items do not end at the declared data section"
            );
        }
    }
    Ok((kind, records, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 04 01 | 12 0a 10 02 00 08 00 01 84 00 00 00
    const READ_ONE: [u8; 24] = [
        0x32, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x0E, 0x00, 0x00, 0x04, 0x01, 0x12, 0x0A, 0x10,
        0x02, 0x00, 0x08, 0x00, 0x01, 0x84, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn test_parse_var_spec() {
        let (spec, next) = parse_var_spec(&READ_ONE, 12).unwrap();
        assert_eq!(next, 24);
        assert_eq!(spec.spec_type, 0x12);
        assert_eq!(spec.transport_size, 0x02);
        assert_eq!(spec.bit_len, 8);
        assert_eq!(spec.objlen(), 1);
        assert_eq!(spec.db_number, 1);
        assert_eq!(spec.area, 0x84);
        assert_eq!(spec.address, S7AnyAddress([0, 0, 0]));
    }

    #[test]
    fn test_parse_var_spec_rejects_other_addressing() {
        let mut bytes = READ_ONE;
        bytes[14] = 0xB0; // DBREAD syntax
        assert_eq!(
            parse_var_spec(&bytes, 12),
            Err(Error::UnsupportedAddressing {
                syntax_id: 0xB0,
                addr_len: 10
            })
        );
        let mut bytes = READ_ONE;
        bytes[13] = 0x07;
        assert!(matches!(
            parse_var_spec(&bytes, 12),
            Err(Error::UnsupportedAddressing { addr_len: 7, .. })
        ));
        assert!(matches!(
            parse_var_spec(&READ_ONE[..23], 12),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_parse_param_items_job_read() {
        let (header, layout) = S7Header::parse(&READ_ONE).unwrap();
        let (kind, records, cursor) = parse_param_items(&READ_ONE, &header, &layout).unwrap();
        assert_eq!(kind, TelegramKind::ReadVarRequest);
        assert_eq!(cursor, layout.data_start);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.function, S7Function::ReadVar);
        assert_eq!(record.rosctr, Rosctr::Job);
        assert_eq!(record.pdu_ref, 1);
        assert_eq!(record.item, 0);
        assert_eq!(record.trsize, Some(2));
        assert_eq!(record.objlen, Some(1));
        assert_eq!(record.dbid, Some(1));
        assert_eq!(record.area, Some(0x84));
        assert_eq!(record.status, None);
    }

    #[test]
    fn test_parse_param_items_ack_data_has_no_specs() {
        // Ack_Data ReadVar, three items, parameter section is just 04 03
        let bytes = [
            0x32, 0x03, 0x00, 0x00, 0x00, 0x05, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x04, 0x03,
        ];
        let (header, layout) = S7Header::parse(&bytes).unwrap();
        let (kind, records, cursor) = parse_param_items(&bytes, &header, &layout).unwrap();
        assert_eq!(kind, TelegramKind::ReadVarResponse);
        assert_eq!(cursor, layout.param_item_start);
        assert_eq!(cursor, layout.data_start);
        let items: Vec<usize> = records.iter().map(|r| r.item).collect();
        assert_eq!(items, vec![0, 1, 2]);
        assert!(records.iter().all(|r| r.address.is_none()));
    }

    #[test]
    fn test_parse_param_items_unknown_function() {
        let mut bytes = READ_ONE;
        bytes[10] = 0xF0; // setup communication
        let (header, layout) = S7Header::parse(&bytes).unwrap();
        assert_eq!(
            parse_param_items(&bytes, &header, &layout),
            Err(Error::UnsupportedFunction(0xF0))
        );
    }

    #[test]
    fn test_parse_param_items_item_count_overruns() {
        let mut bytes = READ_ONE;
        bytes[11] = 0x02;
        let (header, layout) = S7Header::parse(&bytes).unwrap();
        assert!(parse_param_items(&bytes, &header, &layout)
            .unwrap_err()
            .is_malformed());
    }
}
