use super::parts::{
    BlockRequest, BlockResponse, DownloadRequest, DownloadResponse, TestRequest, TestResponse,
};
use super::{
    ContentType, EnvelopeRequest, EnvelopeResponse, RequestType, ResponseStatus, SerializeConfig,
    SerializeHeader,
};
use crate::{ParseError, TransError, TransResult};

/// Path of the connectivity-test operation.
pub const PATH_TEST: &str = "/test";
/// Path of the download-preparation operation.
pub const PATH_DOWNLOAD: &str = "/download";
/// Path of the block-fetch operation.
pub const PATH_BLOCK: &str = "/block";

/// Encodes and decodes whole frames: outer header plus envelope plus typed body.
///
/// Building a typed request composes the typed body bytes, wraps them in an
/// envelope with the caller-supplied `request_id`, and prefixes the result
/// with the serialize header. Whether the header carries a checksum is taken
/// from the [`SerializeConfig`].
#[derive(Debug, Clone, Default)]
pub struct MessageCodec {
    config: SerializeConfig,
}

impl MessageCodec {
    pub fn new(config: SerializeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializeConfig {
        &self.config
    }

    // --- frame level --- //

    /// Encodes an envelope request into a sendable frame.
    pub fn build_request(&self, request: &EnvelopeRequest) -> TransResult<Vec<u8>> {
        if request.path.len() > usize::from(self.config.max_name_length()) {
            return Err(TransError::Usage("path exceeds the configured name length"));
        }
        let mut body = Vec::with_capacity(request.serialized_size());
        request.emit(&mut body)?;
        self.prefix_with_header(body, EnvelopeRequest::FIELD_COUNT)
    }

    /// Encodes an envelope response into a sendable frame.
    pub fn build_response(&self, response: &EnvelopeResponse) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(response.serialized_size());
        response.emit(&mut body)?;
        self.prefix_with_header(body, EnvelopeResponse::FIELD_COUNT)
    }

    /// Decodes an envelope request from a whole frame.
    pub fn try_parse_request(&self, frame: &[u8]) -> TransResult<EnvelopeRequest> {
        let body = self.frame_body(frame)?;
        Ok(EnvelopeRequest::parse(&mut &*body, &self.config)?)
    }

    /// Decodes an envelope response from a whole frame.
    pub fn try_parse_response(&self, frame: &[u8]) -> TransResult<EnvelopeResponse> {
        let body = self.frame_body(frame)?;
        Ok(EnvelopeResponse::parse(&mut &*body, &self.config)?)
    }

    // --- typed requests --- //

    /// Builds a framed `/test` request.
    pub fn build_test_request(&self, request: &TestRequest, request_id: u64) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(request.serialized_size());
        request.emit(&mut body)?;
        self.build_request(&Self::typed_request(RequestType::Test, PATH_TEST, request_id, body))
    }

    /// Builds a framed `/download` request.
    pub fn build_download_request(
        &self,
        request: &DownloadRequest,
        request_id: u64,
    ) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(request.serialized_size());
        request.emit(&mut body)?;
        self.build_request(&Self::typed_request(RequestType::Download, PATH_DOWNLOAD, request_id, body))
    }

    /// Builds a framed `/block` request.
    pub fn build_block_request(
        &self,
        request: &BlockRequest,
        request_id: u64,
    ) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(request.serialized_size());
        request.emit(&mut body)?;
        self.build_request(&Self::typed_request(RequestType::Block, PATH_BLOCK, request_id, body))
    }

    // --- typed responses --- //

    /// Builds a framed response carrying a [`TestResponse`] body.
    pub fn build_test_response(
        &self,
        response: &TestResponse,
        request_id: u64,
        status: ResponseStatus,
    ) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(response.serialized_size());
        response.emit(&mut body)?;
        self.build_response(&Self::typed_response(request_id, status, body))
    }

    /// Builds a framed response carrying a [`DownloadResponse`] body.
    pub fn build_download_response(
        &self,
        response: &DownloadResponse,
        request_id: u64,
        status: ResponseStatus,
    ) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(response.serialized_size());
        response.emit(&mut body)?;
        self.build_response(&Self::typed_response(request_id, status, body))
    }

    /// Builds a framed response carrying a [`BlockResponse`] body.
    pub fn build_block_response(
        &self,
        response: &BlockResponse,
        request_id: u64,
        status: ResponseStatus,
    ) -> TransResult<Vec<u8>> {
        let mut body = Vec::with_capacity(response.serialized_size());
        response.emit(&mut body)?;
        self.build_response(&Self::typed_response(request_id, status, body))
    }

    // --- typed bodies --- //

    pub fn try_parse_test_request(&self, body: &[u8]) -> TransResult<TestRequest> {
        Ok(TestRequest::parse(&mut &*body, &self.config)?)
    }
    pub fn try_parse_test_response(&self, body: &[u8]) -> TransResult<TestResponse> {
        Ok(TestResponse::parse(&mut &*body, &self.config)?)
    }
    pub fn try_parse_download_request(&self, body: &[u8]) -> TransResult<DownloadRequest> {
        Ok(DownloadRequest::parse(&mut &*body, &self.config)?)
    }
    pub fn try_parse_download_response(&self, body: &[u8]) -> TransResult<DownloadResponse> {
        Ok(DownloadResponse::parse(&mut &*body, &self.config)?)
    }
    pub fn try_parse_block_request(&self, body: &[u8]) -> TransResult<BlockRequest> {
        Ok(BlockRequest::parse(&mut &*body, &self.config)?)
    }
    pub fn try_parse_block_response(&self, body: &[u8]) -> TransResult<BlockResponse> {
        Ok(BlockResponse::parse(&mut &*body, &self.config)?)
    }

    // --- internals --- //

    fn typed_request(
        request_type: RequestType,
        path: &str,
        request_id: u64,
        body: Vec<u8>,
    ) -> EnvelopeRequest {
        EnvelopeRequest {
            version: crate::ENVELOPE_VERSION,
            request_id,
            request_type: request_type as u8,
            path: path.to_string(),
            content_type: ContentType::DaneJoe,
            body,
        }
    }

    fn typed_response(request_id: u64, status: ResponseStatus, body: Vec<u8>) -> EnvelopeResponse {
        EnvelopeResponse {
            version: crate::ENVELOPE_VERSION,
            request_id,
            status,
            content_type: ContentType::DaneJoe,
            body,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn prefix_with_header(&self, body: Vec<u8>, field_count: u16) -> TransResult<Vec<u8>> {
        if body.len() > self.config.max_message_length() as usize {
            return Err(TransError::Usage(
                "message body exceeds the configured maximum length",
            ));
        }
        let header = SerializeHeader::for_body(&body, self.config.is_checksum_on_send(), field_count);
        let mut frame = Vec::with_capacity(header.serialized_size() as usize + body.len());
        header.emit(&mut frame)?;
        frame.extend_from_slice(&body);
        trace!("MessageCodec: built frame of {} bytes", frame.len());
        Ok(frame)
    }

    // Validates the outer header and returns the body slice.
    #[allow(clippy::cast_possible_truncation)]
    fn frame_body<'a>(&self, frame: &'a [u8]) -> TransResult<&'a [u8]> {
        let (header, header_size) = SerializeHeader::parse(frame, &self.config)?;
        let expected = header_size + header.message_length as usize;
        if frame.len() < expected {
            return Err(ParseError::Truncated.into());
        }
        let body = &frame[header_size..expected];
        if header.flag.has_checksum() {
            let computed = crc32fast::hash(body);
            if computed != header.checksum {
                return Err(TransError::ChecksumMismatch {
                    expected: header.checksum,
                    computed,
                });
            }
        }
        Ok(body)
    }
}
