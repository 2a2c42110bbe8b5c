/// The unit the reactor transports: one whole frame, tagged with the
/// connection it arrived on or is destined for.
///
/// The reactor moves `PosixFrame`s between sockets and the mailbox without
/// looking inside; the codec operates one level above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixFrame {
    /// Reactor-assigned id of the connection.
    pub connect_id: u64,
    /// Raw frame bytes (header plus body).
    pub payload: Vec<u8>,
}

impl PosixFrame {
    pub fn new(connect_id: u64, payload: Vec<u8>) -> Self {
        Self {
            connect_id,
            payload,
        }
    }
}
