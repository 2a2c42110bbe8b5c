use crate::protocol::{util, SerializeConfig};
use crate::ParseError;
use byteorder::{BigEndian, WriteBytesExt};

/// Asks for one block of a file.
///
/// Which blocks to ask for, and in which order, is the caller's business;
/// the core only transports the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRequest {
    pub block_id: i64,
    pub file_id: i64,
    pub task_id: i64,
    pub offset: i64,
    pub block_size: i64,
}

/// One block of file data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub block_id: i64,
    pub file_id: i64,
    pub task_id: i64,
    pub offset: i64,
    pub block_size: i64,
    pub data: Vec<u8>,
}

impl BlockRequest {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_i64::<BigEndian>(self.block_id)?;
        w.write_i64::<BigEndian>(self.file_id)?;
        w.write_i64::<BigEndian>(self.task_id)?;
        w.write_i64::<BigEndian>(self.offset)?;
        w.write_i64::<BigEndian>(self.block_size)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, _config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            block_id: util::parse_i64(rdr)?,
            file_id: util::parse_i64(rdr)?,
            task_id: util::parse_i64(rdr)?,
            offset: util::parse_i64(rdr)?,
            block_size: util::parse_i64(rdr)?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        40
    }
}

impl BlockResponse {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_i64::<BigEndian>(self.block_id)?;
        w.write_i64::<BigEndian>(self.file_id)?;
        w.write_i64::<BigEndian>(self.task_id)?;
        w.write_i64::<BigEndian>(self.offset)?;
        w.write_i64::<BigEndian>(self.block_size)?;
        util::emit_bytes_u32(&self.data, w)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            block_id: util::parse_i64(rdr)?,
            file_id: util::parse_i64(rdr)?,
            task_id: util::parse_i64(rdr)?,
            offset: util::parse_i64(rdr)?,
            block_size: util::parse_i64(rdr)?,
            data: util::parse_bytes_u32(rdr, config.max_message_length())?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        40 + 4 + self.data.len()
    }
}

impl std::fmt::Display for BlockRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "block_id={} | file_id={} | task_id={} | offset={} | block_size={}",
            self.block_id, self.file_id, self.task_id, self.offset, self.block_size
        )
    }
}

impl std::fmt::Display for BlockResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "block_id={} | file_id={} | task_id={} | offset={} | block_size={} | data_size={}",
            self.block_id,
            self.file_id,
            self.task_id,
            self.offset,
            self.block_size,
            self.data.len()
        )
    }
}
