use crate::ParseError;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

// Read n bytes, return as Vec<u8>
pub(crate) fn parse_bytes(len: usize, rdr: &mut dyn std::io::Read) -> Result<Vec<u8>, ParseError> {
    let mut vec = vec![0_u8; len];
    rdr.read_exact(&mut vec).map_err(|_| ParseError::Truncated)?;
    Ok(vec)
}

pub(crate) fn parse_u8(rdr: &mut dyn std::io::Read) -> Result<u8, ParseError> {
    rdr.read_u8().map_err(|_| ParseError::Truncated)
}

pub(crate) fn parse_u16(rdr: &mut dyn std::io::Read) -> Result<u16, ParseError> {
    rdr.read_u16::<BigEndian>().map_err(|_| ParseError::Truncated)
}

pub(crate) fn parse_u32(rdr: &mut dyn std::io::Read) -> Result<u32, ParseError> {
    rdr.read_u32::<BigEndian>().map_err(|_| ParseError::Truncated)
}

pub(crate) fn parse_u64(rdr: &mut dyn std::io::Read) -> Result<u64, ParseError> {
    rdr.read_u64::<BigEndian>().map_err(|_| ParseError::Truncated)
}

pub(crate) fn parse_i64(rdr: &mut dyn std::io::Read) -> Result<i64, ParseError> {
    rdr.read_i64::<BigEndian>().map_err(|_| ParseError::Truncated)
}

// Strings inside bodies are length-prefixed with 4 bytes; the envelope path
// keeps its 2-byte prefix. All prefixes are big-endian.

pub(crate) fn parse_string_u16(
    rdr: &mut dyn std::io::Read,
    max_len: u16,
) -> Result<String, ParseError> {
    let len = parse_u16(rdr)?;
    if len > max_len {
        return Err(ParseError::OverLength {
            length: u64::from(len),
            max: u64::from(max_len),
        });
    }
    string_from_bytes(parse_bytes(len as usize, rdr)?)
}

pub(crate) fn parse_string_u32(
    rdr: &mut dyn std::io::Read,
    max_len: u32,
) -> Result<String, ParseError> {
    string_from_bytes(parse_bytes_u32(rdr, max_len)?)
}

pub(crate) fn parse_bytes_u32(
    rdr: &mut dyn std::io::Read,
    max_len: u32,
) -> Result<Vec<u8>, ParseError> {
    let len = parse_u32(rdr)?;
    if len > max_len {
        return Err(ParseError::OverLength {
            length: u64::from(len),
            max: u64::from(max_len),
        });
    }
    parse_bytes(len as usize, rdr)
}

fn string_from_bytes(bytes: Vec<u8>) -> Result<String, ParseError> {
    String::from_utf8(bytes).map_err(|_| ParseError::BadUtf8)
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn emit_string_u16(s: &str, w: &mut dyn std::io::Write) -> std::io::Result<()> {
    w.write_u16::<BigEndian>(s.len() as u16)?;
    w.write_all(s.as_bytes())
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn emit_string_u32(s: &str, w: &mut dyn std::io::Write) -> std::io::Result<()> {
    w.write_u32::<BigEndian>(s.len() as u32)?;
    w.write_all(s.as_bytes())
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn emit_bytes_u32(bytes: &[u8], w: &mut dyn std::io::Write) -> std::io::Result<()> {
    w.write_u32::<BigEndian>(bytes.len() as u32)?;
    w.write_all(bytes)
}
