use crate::protocol::{FrameAssembler, PosixFrame, SerializeConfig};
use crate::TransResult;
use mio::net::TcpStream;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::Instant;

// Scratch size of one read(2) call.
const BUFFER_SIZE: usize = 16 * 1024;

/// Whether the connection is still usable after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnState {
    Alive,
    Closed,
}

// Bridges one socket and the reactor mailbox: the read path feeds the frame
// assembler, the write path drains a pending-write backlog.
//
// Owned by the reactor thread; never shared.
#[derive(Debug)]
pub(crate) struct ConnectContext {
    connect_id: u64,
    stream: TcpStream,
    frame_assembler: FrameAssembler,
    write_backlog: VecDeque<Vec<u8>>,
    writable_armed: bool,
    last_activity: Instant,
}

impl ConnectContext {
    pub fn new(connect_id: u64, stream: TcpStream, config: SerializeConfig) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            trace!("ConnectContext {connect_id}: set_nodelay failed: {e}");
        }
        Self {
            connect_id,
            stream,
            frame_assembler: FrameAssembler::new(config),
            write_backlog: VecDeque::new(),
            writable_armed: false,
            last_activity: Instant::now(),
        }
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Whether WRITABLE interest is currently registered for this socket.
    /// Kept in sync by the reactor: armed iff `has_pending_write()`.
    pub fn writable_armed(&self) -> bool {
        self.writable_armed
    }

    pub fn set_writable_armed(&mut self, armed: bool) {
        self.writable_armed = armed;
    }

    pub fn has_pending_write(&self) -> bool {
        !self.write_backlog.is_empty()
    }

    /// Drains all currently readable bytes into the assembler and appends
    /// every whole frame to `frames`.
    ///
    /// `Ok(Closed)` means the peer closed; frames read before the close are
    /// still delivered. An `Err` discredits the connection.
    pub fn read_ready(&mut self, frames: &mut Vec<PosixFrame>) -> TransResult<ConnState> {
        let mut scratch = [0_u8; BUFFER_SIZE];
        loop {
            match self.stream.read(&mut scratch) {
                Ok(0) => {
                    trace!("ConnectContext {}: peer closed", self.connect_id);
                    self.drain_assembler(frames)?;
                    return Ok(ConnState::Closed);
                }
                Ok(n) => {
                    self.last_activity = Instant::now();
                    self.frame_assembler.push_data(&scratch[..n]);
                    self.drain_assembler(frames)?;
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    return Ok(ConnState::Alive);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!("ConnectContext {}: read failed: {e}", self.connect_id);
                    return Err(e.into());
                }
            }
        }
    }

    /// Appends bytes to the write backlog and attempts to flush immediately.
    pub fn write_data(&mut self, bytes: Vec<u8>) -> TransResult<ConnState> {
        self.last_activity = Instant::now();
        self.write_backlog.push_back(bytes);
        self.flush_pending()
    }

    /// Writes as much of the backlog as the kernel accepts.
    ///
    /// A partial write retains the unwritten tail; the reactor keeps WRITABLE
    /// interest armed until the backlog is empty.
    pub fn flush_pending(&mut self) -> TransResult<ConnState> {
        while let Some(front) = self.write_backlog.front_mut() {
            match self.stream.write(front) {
                Ok(0) => {
                    debug!("ConnectContext {}: write returned 0", self.connect_id);
                    return Ok(ConnState::Closed);
                }
                Ok(n) if n == front.len() => {
                    self.write_backlog.pop_front();
                }
                Ok(n) => {
                    front.drain(..n);
                }
                Err(ref e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::NotConnected
                    ) =>
                {
                    // NotConnected: a client socket whose non-blocking connect
                    // has not completed yet; retry on the writable event
                    break;
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!("ConnectContext {}: write failed: {e}", self.connect_id);
                    return Err(e.into());
                }
            }
        }
        Ok(ConnState::Alive)
    }

    fn drain_assembler(&mut self, frames: &mut Vec<PosixFrame>) -> TransResult<()> {
        while let Some(frame) = self.frame_assembler.pop_frame()? {
            frames.push(PosixFrame::new(self.connect_id, frame));
        }
        Ok(())
    }
}
