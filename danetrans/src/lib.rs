//! Bidirectional file-transfer server/client core, speaking a custom
//! length-prefixed binary protocol over TCP.
//!
//! The heart of the crate is a single-threaded reactor ([`ReactorEventLoop`])
//! that owns many non-blocking connections, a streaming frame assembler that
//! reconstructs whole frames from partial reads, and a mailbox
//! ([`ReactorMailBox`]) that hands frames between the reactor thread and a
//! fixed worker pool without ever blocking the reactor on a worker.
//!
//! Most applications use the two facades:
//!
//! * [`TransServer`] binds an address, spawns the reactor thread and the
//!   workers, and routes decoded requests through a [`TransService`];
//! * [`TransClient`] connects to a `danejoe://host:port` URL and offers the
//!   typed request senders.
//!
//! ```rust,no_run
//! use danetrans::{
//!     ReactorConfiguration, ResponseStatus, SerializeConfig, TransClient, TransServer,
//!     TransService,
//! };
//!
//! # fn main() -> danetrans::TransResult<()> {
//! let service = TransService::new(SerializeConfig::default());
//! let server = TransServer::start(
//!     "127.0.0.1:0".parse().unwrap(),
//!     service,
//!     ReactorConfiguration::default(),
//! )?;
//!
//! let url = format!("danejoe://127.0.0.1:{}", server.local_addr().port());
//! let client = TransClient::connect(&url, ReactorConfiguration::default())?;
//! let request_id = client.send_test_request("hello")?;
//! let response = client.recv_response()?;
//! assert_eq!(response.request_id, request_id);
//! assert_eq!(response.status, ResponseStatus::Ok);
//! # Ok(())
//! # }
//! ```
//!
//! Everything the facades are built from is public too, so a custom wiring
//! can use the reactor, the mailbox, the codec, and the thread pool directly.

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

/// The wire-level limits and options: maximal message length, maximal name
/// length, and whether outgoing frames carry a CRC32 checksum.
///
/// ```rust
/// use danetrans::SerializeConfig;
/// let config = SerializeConfig::default()
///     .with_max_message_length(8 * 1024 * 1024)
///     .with_checksum_on_send(true);
/// ```
pub use danetrans_impl::SerializeConfig;

/// A collection of settings that influence the runtime behavior of the
/// reactor and its workers.
///
/// ```rust
/// use danetrans::ReactorConfiguration;
/// let config = ReactorConfiguration::default()
///     .with_worker_count(8)
///     .with_inbound_queue_capacity(256);
/// ```
pub use danetrans_impl::ReactorConfiguration;

pub use danetrans_impl::{
    ContentType, EnvelopeRequest, EnvelopeResponse, FrameAssembler, MessageCodec, ParseError,
    PosixFrame, ReactorEvent, ReactorEventLoop, ReactorHandle, ReactorMailBox, RequestHandler,
    RequestType, ResponseStatus, SerializeFlag, SerializeHeader, ThreadPool, TransClient,
    TransError, TransResult, TransServer, TransService, ENVELOPE_VERSION, MAGIC_NUMBER,
    PATH_BLOCK, PATH_DOWNLOAD, PATH_TEST, PROTOCOL_VERSION,
};

pub use danetrans_impl::{parts, url};
