use crate::protocol::{util, SerializeConfig};
use crate::ParseError;
use byteorder::{BigEndian, WriteBytesExt};

/// Asks the server to prepare a file for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub file_id: i64,
    pub task_id: i64,
}

/// Describes the file the server prepared: its name, size, and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub file_id: i64,
    pub task_id: i64,
    pub file_name: String,
    pub file_size: i64,
    pub md5_code: String,
}

impl DownloadRequest {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_i64::<BigEndian>(self.file_id)?;
        w.write_i64::<BigEndian>(self.task_id)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, _config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            file_id: util::parse_i64(rdr)?,
            task_id: util::parse_i64(rdr)?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        16
    }
}

impl DownloadResponse {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_i64::<BigEndian>(self.file_id)?;
        w.write_i64::<BigEndian>(self.task_id)?;
        util::emit_string_u32(&self.file_name, w)?;
        w.write_i64::<BigEndian>(self.file_size)?;
        util::emit_string_u32(&self.md5_code, w)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            file_id: util::parse_i64(rdr)?,
            task_id: util::parse_i64(rdr)?,
            file_name: util::parse_string_u32(rdr, u32::from(config.max_name_length()))?,
            file_size: util::parse_i64(rdr)?,
            md5_code: util::parse_string_u32(rdr, u32::from(config.max_name_length()))?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        8 + 8 + 4 + self.file_name.len() + 8 + 4 + self.md5_code.len()
    }
}

impl std::fmt::Display for DownloadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "file_id={} | task_id={}", self.file_id, self.task_id)
    }
}

impl std::fmt::Display for DownloadResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "file_id={} | task_id={} | file_name={} | file_size={} | md5_code={}",
            self.file_id, self.task_id, self.file_name, self.file_size, self.md5_code
        )
    }
}
