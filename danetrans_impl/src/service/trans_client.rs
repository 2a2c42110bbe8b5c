use crate::conn::ReactorConfiguration;
use crate::protocol::parts::{BlockRequest, DownloadRequest, TestRequest};
use crate::protocol::{EnvelopeRequest, EnvelopeResponse, MessageCodec, PosixFrame};
use crate::reactor::{ReactorEventLoop, ReactorHandle, ReactorMailBox};
use crate::url::{UrlResolver, UrlScheme};
use crate::{TransError, TransResult};
use std::net::ToSocketAddrs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Client facade: one reactor thread with one outgoing connection, plus the
/// codec and the request-id counter.
///
/// Sends are fire-and-forget; responses arrive on the inbound mailbox and are
/// matched to requests by the caller via the request id. On a single
/// connection responses keep their wire order, nothing more.
#[derive(Debug)]
pub struct TransClient {
    mailbox: Arc<ReactorMailBox>,
    codec: MessageCodec,
    connect_id: u64,
    request_id_counter: AtomicU64,
    reactor_handle: ReactorHandle,
    reactor_thread: Option<JoinHandle<TransResult<()>>>,
}

impl TransClient {
    /// Connects to a `danejoe://host[:port]` URL.
    pub fn connect(url: &str, config: ReactorConfiguration) -> TransResult<Self> {
        let info = UrlResolver::parse(url)?;
        if info.scheme == UrlScheme::Unknown || info.host.is_empty() || info.port == 0 {
            return Err(TransError::conn_params(
                format!("URL does not name a usable endpoint: {info}").into(),
            ));
        }
        let addr = info
            .addr()
            .to_socket_addrs()
            .map_err(|e| TransError::conn_params(Box::new(e)))?
            .next()
            .ok_or_else(|| TransError::conn_params("address resolution came up empty".into()))?;

        let mailbox = Arc::new(ReactorMailBox::new(config.inbound_queue_capacity()));
        let mut reactor = ReactorEventLoop::new_client(Arc::clone(&mailbox), config.clone())?;
        let connect_id = reactor.connect(addr)?;
        let reactor_handle = reactor.handle();
        let reactor_thread = std::thread::Builder::new()
            .name("trans-client-reactor".to_string())
            .spawn(move || reactor.run())?;
        debug!("TransClient: connection {connect_id} to {addr}");

        Ok(Self {
            mailbox,
            codec: MessageCodec::new(config.serialize().clone()),
            connect_id,
            request_id_counter: AtomicU64::new(1),
            reactor_handle,
            reactor_thread: Some(reactor_thread),
        })
    }

    pub fn connect_id(&self) -> u64 {
        self.connect_id
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    /// Draws the next request id from the monotonic counter.
    pub fn next_request_id(&self) -> u64 {
        self.request_id_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends a `/test` request; returns the request id for matching the response.
    pub fn send_test_request(&self, message: &str) -> TransResult<u64> {
        let request_id = self.next_request_id();
        let frame = self.codec.build_test_request(
            &TestRequest {
                message: message.to_string(),
            },
            request_id,
        )?;
        self.push(frame)?;
        Ok(request_id)
    }

    /// Sends a `/download` request; returns the request id.
    pub fn send_download_request(&self, file_id: i64, task_id: i64) -> TransResult<u64> {
        let request_id = self.next_request_id();
        let frame = self
            .codec
            .build_download_request(&DownloadRequest { file_id, task_id }, request_id)?;
        self.push(frame)?;
        Ok(request_id)
    }

    /// Sends a `/block` request; returns the request id.
    pub fn send_block_request(&self, request: &BlockRequest) -> TransResult<u64> {
        let request_id = self.next_request_id();
        let frame = self.codec.build_block_request(request, request_id)?;
        self.push(frame)?;
        Ok(request_id)
    }

    /// Sends a caller-built envelope, e.g. with a JSON body.
    pub fn send_request(&self, request: &EnvelopeRequest) -> TransResult<()> {
        let frame = self.codec.build_request(request)?;
        self.push(frame)
    }

    /// Blocks until the next response frame arrives and decodes it.
    pub fn recv_response(&self) -> TransResult<EnvelopeResponse> {
        let frame = self.mailbox.pop_from_to_server_frame()?;
        self.codec.try_parse_response(&frame.payload)
    }

    /// Non-blocking variant of [`recv_response`](Self::recv_response).
    pub fn try_recv_response(&self) -> TransResult<Option<EnvelopeResponse>> {
        match self.mailbox.try_pop_from_to_server_queue()? {
            Some(frame) => Ok(Some(self.codec.try_parse_response(&frame.payload)?)),
            None => Ok(None),
        }
    }

    /// Stops the client reactor and waits for its thread.
    pub fn stop(mut self) -> TransResult<()> {
        self.shutdown()
    }

    fn push(&self, frame: Vec<u8>) -> TransResult<()> {
        self.mailbox
            .push_to_client_frame(PosixFrame::new(self.connect_id, frame))
    }

    fn shutdown(&mut self) -> TransResult<()> {
        self.reactor_handle.stop();
        if let Some(thread) = self.reactor_thread.take() {
            thread
                .join()
                .map_err(|_| TransError::Impl("client reactor thread panicked"))??;
        }
        Ok(())
    }
}

impl Drop for TransClient {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("TransClient: shutdown while dropping failed: {e}");
        }
    }
}
