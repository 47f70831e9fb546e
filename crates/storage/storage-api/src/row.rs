//! Marshaling of `Row`s to and from the slotted-page byte format a
//! `HeapTable` persists (spec §4.3).

use crate::errors::HeapTableError;
use crate::value::{ColumnAttribute, Row, Value};
use binary_helpers::le::{read_le, write_le};

/// Packs `row`'s values, in `column_names` order, into the byte layout
/// `unmarshal` inverts: `INT` as 4 little-endian bytes, `TEXT` as a 16-bit
/// length prefix followed by its ASCII bytes, no padding between fields.
pub fn marshal(
    row: &Row,
    column_names: &[String],
    column_attributes: &[ColumnAttribute],
) -> Result<Vec<u8>, HeapTableError> {
    let mut bytes = Vec::new();
    for (name, attribute) in column_names.iter().zip(column_attributes) {
        let value = row
            .get(name)
            .ok_or_else(|| HeapTableError::Null { column: name.clone() })?;
        match (attribute, value) {
            (ColumnAttribute::Int, Value::Int(n)) => {
                let mut buf = [0u8; 4];
                write_le(&mut buf, 0, *n as u32)?;
                bytes.extend_from_slice(&buf);
            }
            (ColumnAttribute::Text, Value::Text(s)) => {
                let len = s.len() as u16;
                let mut len_buf = [0u8; 2];
                write_le(&mut len_buf, 0, len)?;
                bytes.extend_from_slice(&len_buf);
                bytes.extend_from_slice(s.as_bytes());
            }
            _ => return Err(HeapTableError::Null { column: name.clone() }),
        }
    }
    Ok(bytes)
}

/// The exact inverse of `marshal`.
pub fn unmarshal(
    bytes: &[u8],
    column_names: &[String],
    column_attributes: &[ColumnAttribute],
) -> Result<Row, HeapTableError> {
    let mut row = Row::new();
    let mut offset = 0usize;
    for (name, attribute) in column_names.iter().zip(column_attributes) {
        match attribute {
            ColumnAttribute::Int => {
                let n: u32 = read_le(bytes, offset)?;
                row.insert(name.clone(), Value::Int(n as i32));
                offset += 4;
            }
            ColumnAttribute::Text => {
                let len: u16 = read_le(bytes, offset)?;
                offset += 2;
                let len = len as usize;
                let text = std::str::from_utf8(&bytes[offset..offset + len])
                    .unwrap_or_default()
                    .to_string();
                row.insert(name.clone(), Value::Text(text));
                offset += len;
            }
            ColumnAttribute::Boolean => {
                // never marshaled (spec §3); nothing to read.
            }
        }
    }
    Ok(row)
}
