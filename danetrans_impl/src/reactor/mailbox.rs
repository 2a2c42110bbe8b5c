use crate::protocol::PosixFrame;
use crate::{TransError, TransResult};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// The only channel between the reactor thread and the worker threads.
///
/// Two directions with different shapes, because the access patterns differ:
///
/// * inbound (reactor to workers): a bounded MPMC queue of [`PosixFrame`].
///   Bounded to apply backpressure; when it is full the reactor stops pulling
///   from the sockets until a worker pops.
/// * outbound (workers to reactor): one FIFO per connection, all guarded by a
///   single mutex. After every push the producer wakes the reactor through
///   the poll waker, so the response goes out promptly.
///
/// Removing a connection removes its outbound queue first; any later push for
/// that connection is dropped silently.
#[derive(Debug)]
pub struct ReactorMailBox {
    to_server_tx: Mutex<Option<Sender<PosixFrame>>>,
    to_server_rx: Receiver<PosixFrame>,
    to_client_queues: Mutex<HashMap<u64, VecDeque<PosixFrame>>>,
    waker: Mutex<Option<Arc<mio::Waker>>>,
}

impl ReactorMailBox {
    pub fn new(inbound_capacity: usize) -> Self {
        let (tx, rx) = bounded(inbound_capacity);
        Self {
            to_server_tx: Mutex::new(Some(tx)),
            to_server_rx: rx,
            to_client_queues: Mutex::new(HashMap::new()),
            waker: Mutex::new(None),
        }
    }

    // The reactor hands in its waker once the poll instance exists.
    pub(crate) fn set_waker(&self, waker: Arc<mio::Waker>) -> TransResult<()> {
        *self.waker.lock()? = Some(waker);
        Ok(())
    }

    pub(crate) fn add_to_client_queue(&self, connect_id: u64) -> TransResult<()> {
        self.to_client_queues
            .lock()?
            .insert(connect_id, VecDeque::new());
        Ok(())
    }

    pub(crate) fn remove_to_client_queue(&self, connect_id: u64) {
        if let Ok(mut queues) = self.to_client_queues.lock() {
            queues.remove(&connect_id);
        }
    }

    /// Queues a frame for transmission and wakes the reactor.
    ///
    /// A frame addressed to a connection the reactor no longer owns is
    /// dropped silently.
    pub fn push_to_client_frame(&self, frame: PosixFrame) -> TransResult<()> {
        {
            let mut queues = self.to_client_queues.lock()?;
            match queues.get_mut(&frame.connect_id) {
                Some(queue) => queue.push_back(frame),
                None => {
                    debug!(
                        "ReactorMailBox: dropping frame for gone connection {}",
                        frame.connect_id
                    );
                    return Ok(());
                }
            }
        }
        if let Some(waker) = &*self.waker.lock()? {
            waker.wake()?;
        }
        Ok(())
    }

    /// Hands a received frame to the workers; blocks while the queue is full.
    ///
    /// Called by the reactor; blocking here is what pauses the socket reads
    /// while the workers are behind.
    pub fn push_to_server_frame(&self, frame: PosixFrame) -> TransResult<()> {
        // clone the sender out of the lock so close() cannot be starved by a
        // blocking send
        let tx = self.to_server_tx.lock()?.clone();
        match tx {
            Some(tx) => tx.send(frame).map_err(|_| TransError::MailboxClosed),
            None => Err(TransError::MailboxClosed),
        }
    }

    /// Blocking pop of the next received frame.
    ///
    /// Returns `Err(TransError::MailboxClosed)` (a branch, not a defect) once
    /// the mailbox is closed and drained.
    pub fn pop_from_to_server_frame(&self) -> TransResult<PosixFrame> {
        self.to_server_rx
            .recv()
            .map_err(|_| TransError::MailboxClosed)
    }

    /// Non-blocking variant of [`pop_from_to_server_frame`](Self::pop_from_to_server_frame).
    pub fn try_pop_from_to_server_queue(&self) -> TransResult<Option<PosixFrame>> {
        match self.to_server_rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransError::MailboxClosed),
        }
    }

    // Reactor-side pop of the next frame queued for one connection.
    pub(crate) fn pop_from_to_client_queue(&self, connect_id: u64) -> Option<PosixFrame> {
        let mut queues = self.to_client_queues.lock().ok()?;
        queues.get_mut(&connect_id)?.pop_front()
    }

    /// Closes the inbound queue; blocked and future pops wake with
    /// `TransError::MailboxClosed` once the queue is drained.
    pub fn close(&self) {
        if let Ok(mut tx) = self.to_server_tx.lock() {
            tx.take();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.to_server_tx
            .lock()
            .map(|tx| tx.is_none())
            .unwrap_or(true)
    }
}
