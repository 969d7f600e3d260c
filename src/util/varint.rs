//! Variable-length integer encoding utilities.
//!
//! Used by the tensor wire format for dimension counts, name lengths and
//! dimension sizes. Values use 7 bits per byte with a continuation bit.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{DocMatchError, Result};

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(10);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Write a variable-length encoded u64 to a writer.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = encode_u64(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u64 from a reader.
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        let byte = reader.read_u8()?;

        if shift >= 64 {
            return Err(DocMatchError::other("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
    }
}

/// Read a variable-length encoded length and check it fits in `usize`.
pub fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    let value = read_u64(reader)?;
    usize::try_from(value).map_err(|_| DocMatchError::other(format!("length {value} out of range")))
}
