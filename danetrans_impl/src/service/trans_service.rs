use crate::protocol::parts::{TestRequest, TestResponse};
use crate::protocol::{
    ContentType, EnvelopeRequest, EnvelopeResponse, MessageCodec, PosixFrame, ResponseStatus,
    SerializeConfig, PATH_TEST,
};
use crate::{TransError, TransResult};
use std::collections::HashMap;

/// Produces the response for one decoded request.
///
/// Handlers are injected at startup and run on worker threads; they may block
/// on external collaborators (disk, database).
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &EnvelopeRequest) -> TransResult<EnvelopeResponse>;
}

/// The server-side worker body: decodes request envelopes, routes them by
/// path, and encodes the response.
///
/// `/test` is answered built-in with an echo. Other paths go to registered
/// handlers; a path nobody handles is answered with `NotImplemented`.
/// Malformed frames are not answered at all, because the request id may not
/// be recoverable; the connection teardown happens upstream.
pub struct TransService {
    codec: MessageCodec,
    handlers: HashMap<String, Box<dyn RequestHandler>>,
}

impl std::fmt::Debug for TransService {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("TransService")
            .field("codec", &self.codec)
            .field("handler_paths", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TransService {
    pub fn new(config: SerializeConfig) -> Self {
        Self {
            codec: MessageCodec::new(config),
            handlers: HashMap::new(),
        }
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    /// Registers the handler responsible for `path`.
    pub fn register_handler(&mut self, path: &str, handler: Box<dyn RequestHandler>) {
        self.handlers.insert(path.to_string(), handler);
    }

    /// Processes one inbound frame; returns the response frame, if one is due.
    pub fn handle_frame(&self, frame: &PosixFrame) -> Option<PosixFrame> {
        let request = match self.codec.try_parse_request(&frame.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    "TransService: dropping malformed frame from connection {}: {e}",
                    frame.connect_id
                );
                return None;
            }
        };
        debug!("TransService: request on {}: {request}", frame.connect_id);
        let response = self.route(&request);
        match self.codec.build_response(&response) {
            Ok(bytes) => Some(PosixFrame::new(frame.connect_id, bytes)),
            Err(e) => {
                error!("TransService: building a response failed: {e}");
                None
            }
        }
    }

    fn route(&self, request: &EnvelopeRequest) -> EnvelopeResponse {
        if request.path == PATH_TEST {
            return self.echo(request);
        }
        match self.handlers.get(&request.path) {
            Some(handler) => match handler.handle(request) {
                Ok(response) => response,
                Err(e) => {
                    warn!("TransService: handler for {} failed: {e}", request.path);
                    status_only(request, ResponseStatus::InternalServerError)
                }
            },
            None => status_only(request, ResponseStatus::NotImplemented),
        }
    }

    // The built-in /test operation: echo the message back, in the content
    // type of the request.
    fn echo(&self, request: &EnvelopeRequest) -> EnvelopeResponse {
        let parsed: TransResult<TestRequest> = match request.content_type {
            ContentType::DaneJoe => self.codec.try_parse_test_request(&request.body),
            ContentType::Json => serde_json::from_slice(&request.body).map_err(TransError::from),
            ContentType::Unknown => Err(TransError::Usage("unknown content type")),
        };
        let test = match parsed {
            Ok(test) => test,
            Err(e) => {
                warn!("TransService: bad /test body: {e}");
                return status_only(request, ResponseStatus::BadRequest);
            }
        };
        let response = TestResponse {
            message: test.message,
        };
        let body = match request.content_type {
            ContentType::Json => match serde_json::to_vec(&response) {
                Ok(body) => body,
                Err(e) => {
                    error!("TransService: encoding a /test response failed: {e}");
                    return status_only(request, ResponseStatus::InternalServerError);
                }
            },
            _ => {
                let mut body = Vec::with_capacity(response.serialized_size());
                if response.emit(&mut body).is_err() {
                    return status_only(request, ResponseStatus::InternalServerError);
                }
                body
            }
        };
        EnvelopeResponse {
            version: crate::ENVELOPE_VERSION,
            request_id: request.request_id,
            status: ResponseStatus::Ok,
            content_type: request.content_type,
            body,
        }
    }
}

// A response that carries only a status, mirroring the request's id and
// content type.
fn status_only(request: &EnvelopeRequest, status: ResponseStatus) -> EnvelopeResponse {
    EnvelopeResponse {
        version: crate::ENVELOPE_VERSION,
        request_id: request.request_id,
        status,
        content_type: request.content_type,
        body: Vec::new(),
    }
}
