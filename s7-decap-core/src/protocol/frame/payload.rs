use super::{
    super::error::{Error, Result},
    read_be_u16, read_u8,
    record::S7AccessRecord,
    types::TelegramKind,
    window,
};

/// One value item of the data section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarPayloadItem<'a> {
    pub status: u8,
    pub transport_size: u8,
    /// Length in bytes (the wire field counts bits)
    pub objlen: usize,
    pub data: &'a [u8],
}

impl VarPayloadItem<'_> {
    /// Overwrite the record's value fields; transport size and length from the
    /// data section replace whatever the parameter stage stored.
    pub fn apply_to(&self, record: &mut S7AccessRecord) {
        record.status = Some(self.status);
        record.trsize = Some(self.transport_size);
        record.objlen = Some(self.objlen);
        record.data = hex::encode(self.data);
    }
}

/// Parse the value item at `cursor`; returns it and the cursor advanced by
/// `4 + objlen`.
pub fn parse_var_payload_item(input: &[u8], cursor: usize) -> Result<(VarPayloadItem<'_>, usize)> {
    let status = read_u8(input, cursor)?;
    let transport_size = read_u8(input, cursor + 1)?;
    let objlen = (read_be_u16(input, cursor + 2)? >> 3) as usize;
    let data = window(input, cursor + 4, objlen)?;
    Ok((
        VarPayloadItem {
            status,
            transport_size,
            objlen,
            data,
        },
        cursor + 4 + objlen,
    ))
}

/// Data stage: fill value or status fields of the records produced by the
/// parameter stage. Returns the cursor past the last item read.
pub fn parse_payload_items(
    input: &[u8],
    kind: TelegramKind,
    data_start: usize,
    records: &mut [S7AccessRecord],
) -> Result<usize> {
    let mut cursor = data_start;
    match kind {
        TelegramKind::WriteVarRequest | TelegramKind::ReadVarResponse => {
            for record in records.iter_mut() {
                let (item, next) = parse_var_payload_item(input, cursor)?;
                item.apply_to(record);
                cursor = next;
            }
        }
        TelegramKind::WriteVarResponse => {
            for record in records.iter_mut() {
                record.status = Some(read_u8(input, cursor)?);
                cursor += 1;
            }
        }
        TelegramKind::ReadVarRequest => {}
    }
    if cursor > input.len() {
        return Err(Error::ProtocolViolation {
            context: "data section overruns telegram",
        });
    }
    Ok(cursor)
}
