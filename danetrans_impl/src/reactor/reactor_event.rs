/// Lifecycle notifications the reactor publishes to an optional subscriber.
///
/// The subscriber channel is observation only; frames still travel through
/// the mailbox. A UI layer listens here instead of being wired into the
/// reactor.
#[derive(Debug, Clone)]
pub enum ReactorEvent {
    /// A connection was accepted or established.
    ConnectionOpened {
        connect_id: u64,
        peer: std::net::SocketAddr,
    },
    /// A whole frame arrived on a connection.
    FrameReceived { connect_id: u64, bytes: Vec<u8> },
    /// A connection was torn down.
    ConnectionClosed { connect_id: u64 },
}
