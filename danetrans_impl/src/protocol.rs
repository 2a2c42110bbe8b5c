// The wire layer: header, frame assembly, envelopes, and the message codec.

mod envelope;
mod frame_assembler;
mod message_codec;
mod posix_frame;
mod serialize_config;
mod serialize_header;

pub mod parts;
pub(crate) mod util;

pub use self::{
    envelope::{ContentType, EnvelopeRequest, EnvelopeResponse, RequestType, ResponseStatus},
    frame_assembler::FrameAssembler,
    message_codec::{MessageCodec, PATH_BLOCK, PATH_DOWNLOAD, PATH_TEST},
    posix_frame::PosixFrame,
    serialize_config::SerializeConfig,
    serialize_header::{SerializeFlag, SerializeHeader, MAGIC_NUMBER},
};
