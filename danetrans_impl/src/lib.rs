//! Do not use this crate directly.
//!
//! This is the implementation crate for `danetrans`.
//!
//! It holds the reactor core of the transfer protocol: the event loop, the
//! per-connection contexts, the frame assembler, the envelope codec, the
//! mailbox between the reactor and the workers, and the thin service layer
//! on top.

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

mod conn;
mod protocol;
mod reactor;
mod service;
mod trans_error;
mod worker;

pub mod url;

pub use crate::conn::ReactorConfiguration;
pub use crate::trans_error::{ParseError, TransError, TransResult};

pub use crate::protocol::{
    ContentType, EnvelopeRequest, EnvelopeResponse, FrameAssembler, MessageCodec, PosixFrame,
    RequestType, ResponseStatus, SerializeConfig, SerializeFlag, SerializeHeader, MAGIC_NUMBER,
    PATH_BLOCK, PATH_DOWNLOAD, PATH_TEST,
};

pub use crate::reactor::{ReactorEvent, ReactorEventLoop, ReactorHandle, ReactorMailBox};

pub use crate::service::{RequestHandler, TransClient, TransServer, TransService};

pub use crate::worker::ThreadPool;

/// The typed transfer records carried in envelope bodies.
pub mod parts {
    pub use crate::protocol::parts::{
        BlockRequest, BlockResponse, DownloadRequest, DownloadResponse, TestRequest, TestResponse,
    };
}

/// Version byte written into every frame header.
pub const PROTOCOL_VERSION: u8 = 1;

/// Version written into every envelope.
pub const ENVELOPE_VERSION: u16 = 1;
