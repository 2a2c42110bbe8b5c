use crate::protocol::{util, SerializeConfig};
use crate::ParseError;

/// Connectivity-test request: the server echoes the message back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRequest {
    pub message: String,
}

/// Connectivity-test response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResponse {
    pub message: String,
}

impl TestRequest {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        util::emit_string_u32(&self.message, w)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            message: util::parse_string_u32(rdr, config.max_message_length())?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.message.len()
    }
}

impl TestResponse {
    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        util::emit_string_u32(&self.message, w)
    }

    pub fn parse(rdr: &mut dyn std::io::Read, config: &SerializeConfig) -> Result<Self, ParseError> {
        Ok(Self {
            message: util::parse_string_u32(rdr, config.max_message_length())?,
        })
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.message.len()
    }
}

impl std::fmt::Display for TestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "message={}", self.message)
    }
}

impl std::fmt::Display for TestResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "message={}", self.message)
    }
}
