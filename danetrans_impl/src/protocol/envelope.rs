use super::{util, SerializeConfig};
use crate::ParseError;
use byteorder::{BigEndian, WriteBytesExt};

/// Describes the encoding of an envelope body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json
    Json = 0,
    /// danejoe binary serialized
    DaneJoe = 1,
    /// Unknown encoding
    Unknown = 255,
}
impl ContentType {
    pub(crate) fn from_u8(value: u8) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Json),
            1 => Ok(Self::DaneJoe),
            255 => Ok(Self::Unknown),
            _ => Err(ParseError::BadEnum {
                what: "ContentType",
                value: u32::from(value),
            }),
        }
    }
}

/// HTTP-like status of a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Unknown = 0,
    Ok = 200,
    Created = 201,
    Accepted = 202,
    NoContent = 204,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    Conflict = 409,
    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
}
impl ResponseStatus {
    pub(crate) fn from_u16(value: u16) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Unknown),
            200 => Ok(Self::Ok),
            201 => Ok(Self::Created),
            202 => Ok(Self::Accepted),
            204 => Ok(Self::NoContent),
            400 => Ok(Self::BadRequest),
            401 => Ok(Self::Unauthorized),
            403 => Ok(Self::Forbidden),
            404 => Ok(Self::NotFound),
            405 => Ok(Self::MethodNotAllowed),
            409 => Ok(Self::Conflict),
            500 => Ok(Self::InternalServerError),
            501 => Ok(Self::NotImplemented),
            502 => Ok(Self::BadGateway),
            503 => Ok(Self::ServiceUnavailable),
            _ => Err(ParseError::BadEnum {
                what: "ResponseStatus",
                value: u32::from(value),
            }),
        }
    }
}

/// Well-known values of the `request_type` envelope field.
///
/// The field is transported as a raw `u8`; unknown values pass through the
/// codec untouched and are rejected only at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Test = 1,
    Download = 2,
    Block = 3,
    Unknown = 255,
}
impl RequestType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Test,
            2 => Self::Download,
            3 => Self::Block,
            _ => Self::Unknown,
        }
    }
}

/// The structured request message wrapped inside a frame's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeRequest {
    /// Envelope version.
    pub version: u16,
    /// Caller-supplied id for matching the response.
    pub request_id: u64,
    /// Raw request type, see [`RequestType`].
    pub request_type: u8,
    /// Request path, routes the request on the server.
    pub path: String,
    /// Encoding of `body`.
    pub content_type: ContentType,
    /// Request body.
    pub body: Vec<u8>,
}

/// The structured response message wrapped inside a frame's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeResponse {
    /// Envelope version.
    pub version: u16,
    /// Id of the request this responds to.
    pub request_id: u64,
    /// Outcome of the request.
    pub status: ResponseStatus,
    /// Encoding of `body`.
    pub content_type: ContentType,
    /// Response body.
    pub body: Vec<u8>,
}

impl EnvelopeRequest {
    /// Number of top-level fields, written into the header's `field_count`.
    pub(crate) const FIELD_COUNT: u16 = 6;

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_u16::<BigEndian>(self.version)?;
        w.write_u64::<BigEndian>(self.request_id)?;
        w.write_u8(self.request_type)?;
        util::emit_string_u16(&self.path, w)?;
        w.write_u8(self.content_type as u8)?;
        util::emit_bytes_u32(&self.body, w)
    }

    pub(crate) fn parse(
        rdr: &mut dyn std::io::Read,
        config: &SerializeConfig,
    ) -> Result<Self, ParseError> {
        let version = util::parse_u16(rdr)?;
        let request_id = util::parse_u64(rdr)?;
        let request_type = util::parse_u8(rdr)?;
        let path = util::parse_string_u16(rdr, config.max_name_length())?;
        let content_type = ContentType::from_u8(util::parse_u8(rdr)?)?;
        let body = util::parse_bytes_u32(rdr, config.max_message_length())?;
        Ok(Self {
            version,
            request_id,
            request_type,
            path,
            content_type,
            body,
        })
    }

    /// Encoded size of the envelope (the frame body, without the outer header).
    pub fn serialized_size(&self) -> usize {
        2 + 8 + 1 + 2 + self.path.len() + 1 + 4 + self.body.len()
    }
}

impl EnvelopeResponse {
    /// Number of top-level fields, written into the header's `field_count`.
    pub(crate) const FIELD_COUNT: u16 = 5;

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_u16::<BigEndian>(self.version)?;
        w.write_u64::<BigEndian>(self.request_id)?;
        w.write_u16::<BigEndian>(self.status as u16)?;
        w.write_u8(self.content_type as u8)?;
        util::emit_bytes_u32(&self.body, w)
    }

    pub(crate) fn parse(
        rdr: &mut dyn std::io::Read,
        config: &SerializeConfig,
    ) -> Result<Self, ParseError> {
        let version = util::parse_u16(rdr)?;
        let request_id = util::parse_u64(rdr)?;
        let status = ResponseStatus::from_u16(util::parse_u16(rdr)?)?;
        let content_type = ContentType::from_u8(util::parse_u8(rdr)?)?;
        let body = util::parse_bytes_u32(rdr, config.max_message_length())?;
        Ok(Self {
            version,
            request_id,
            status,
            content_type,
            body,
        })
    }

    /// Encoded size of the envelope (the frame body, without the outer header).
    pub fn serialized_size(&self) -> usize {
        2 + 8 + 2 + 1 + 4 + self.body.len()
    }
}

impl std::fmt::Display for EnvelopeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "body_size={} | content_type={:?} | path={} | request_id={} | request_type={} | version={}",
            self.body.len(),
            self.content_type,
            self.path,
            self.request_id,
            self.request_type,
            self.version
        )
    }
}

impl std::fmt::Display for EnvelopeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "body_size={} | content_type={:?} | request_id={} | status={:?} | version={}",
            self.body.len(),
            self.content_type,
            self.request_id,
            self.status,
            self.version
        )
    }
}
