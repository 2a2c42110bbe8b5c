#![allow(clippy::cast_possible_truncation)]

use super::{ReactorEvent, ReactorMailBox};
use crate::conn::{ConnState, ConnectContext, ReactorConfiguration};
use crate::TransResult;
use crossbeam_channel::{unbounded, Receiver, Sender};
use mio::event::Event;
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token, Waker};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const LISTENER: Token = Token(0);
const NOTIFIER: Token = Token(1);
const TOKEN_BASE: usize = 2;

/// The single-threaded cooperative event loop.
///
/// Owns the poll instance, the listener (server role) or outgoing sockets
/// (client role), the waker, and the connection map. No other thread touches
/// any of these; the mailbox is the only channel in and out.
///
/// Client sockets are edge-triggered, so every readable and writable callback
/// drains until the kernel reports `WouldBlock`.
#[derive(Debug)]
pub struct ReactorEventLoop {
    config: ReactorConfiguration,
    poll: Poll,
    waker: Arc<Waker>,
    listener: Option<TcpListener>,
    mailbox: Arc<ReactorMailBox>,
    connections: HashMap<u64, ConnectContext>,
    running: Arc<AtomicBool>,
    connect_counter: u64,
    subscriber: Option<Sender<ReactorEvent>>,
}

/// Clonable handle for stopping a running reactor from another thread.
#[derive(Debug, Clone)]
pub struct ReactorHandle {
    running: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ReactorHandle {
    /// Asks the loop to exit after its current iteration and wakes it.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Err(e) = self.waker.wake() {
            warn!("ReactorHandle: wake on stop failed: {e}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl ReactorEventLoop {
    /// Creates a server-role reactor listening on `addr`.
    pub fn new_server(
        addr: SocketAddr,
        mailbox: Arc<ReactorMailBox>,
        config: ReactorConfiguration,
    ) -> TransResult<Self> {
        let poll = Poll::new()?;
        let waker = Arc::new(Waker::new(poll.registry(), NOTIFIER)?);
        let mut listener = TcpListener::bind(addr)?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;
        mailbox.set_waker(Arc::clone(&waker))?;
        info!("Reactor: listening on {}", listener.local_addr()?);
        Ok(Self {
            config,
            poll,
            waker,
            listener: Some(listener),
            mailbox,
            connections: HashMap::new(),
            running: Arc::new(AtomicBool::new(true)),
            connect_counter: 0,
            subscriber: None,
        })
    }

    /// Creates a client-role reactor without a listener; add connections
    /// with [`connect`](Self::connect).
    pub fn new_client(
        mailbox: Arc<ReactorMailBox>,
        config: ReactorConfiguration,
    ) -> TransResult<Self> {
        let poll = Poll::new()?;
        let waker = Arc::new(Waker::new(poll.registry(), NOTIFIER)?);
        mailbox.set_waker(Arc::clone(&waker))?;
        Ok(Self {
            config,
            poll,
            waker,
            listener: None,
            mailbox,
            connections: HashMap::new(),
            running: Arc::new(AtomicBool::new(true)),
            connect_counter: 0,
            subscriber: None,
        })
    }

    /// The address the listener is bound to (server role only).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Returns a handle with which another thread can stop this loop.
    pub fn handle(&self) -> ReactorHandle {
        ReactorHandle {
            running: Arc::clone(&self.running),
            waker: Arc::clone(&self.waker),
        }
    }

    /// Attaches a subscriber and returns the receiving end of the event channel.
    pub fn subscribe(&mut self) -> Receiver<ReactorEvent> {
        let (tx, rx) = unbounded();
        self.subscriber = Some(tx);
        rx
    }

    /// Establishes an outgoing connection and returns its connect id.
    ///
    /// The connect is non-blocking; frames pushed to the connection's
    /// outbound queue are transmitted once the socket becomes writable.
    pub fn connect(&mut self, addr: SocketAddr) -> TransResult<u64> {
        let stream = TcpStream::connect(addr)?;
        let id = self.next_connect_id();
        self.register_connection(id, stream, addr)?;
        Ok(id)
    }

    /// Runs the loop until [`ReactorHandle::stop`] is called or the poll
    /// instance fails.
    ///
    /// On exit all connections are dropped (closing their sockets) and the
    /// mailbox is closed, waking every worker blocked on the inbound queue.
    pub fn run(&mut self) -> TransResult<()> {
        let mut events = Events::with_capacity(self.config.max_events());
        info!("Reactor: event loop running");
        while self.running.load(Ordering::SeqCst) {
            if let Err(e) = self.poll.poll(&mut events, self.config.idle_timeout()) {
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                error!("Reactor: poll failed: {e}");
                self.teardown();
                return Err(e.into());
            }
            for event in events.iter() {
                match event.token() {
                    LISTENER => self.acceptable_event(),
                    NOTIFIER => self.notify_event(),
                    token => self.socket_event(token, event),
                }
            }
            self.sweep_idle();
        }
        info!("Reactor: event loop stopped");
        self.teardown();
        Ok(())
    }

    // Accepts until the kernel has no more pending connections.
    fn acceptable_event(&mut self) {
        loop {
            let accepted = match &self.listener {
                Some(listener) => listener.accept(),
                None => return,
            };
            match accepted {
                Ok((stream, peer)) => {
                    let id = self.next_connect_id();
                    if let Err(e) = self.register_connection(id, stream, peer) {
                        warn!("Reactor: registering connection from {peer} failed: {e}");
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("Reactor: accept failed: {e}");
                    break;
                }
            }
        }
    }

    // The waker fired: workers queued outbound frames. Drain every
    // per-connection queue into the corresponding write backlog.
    fn notify_event(&mut self) {
        let ids: Vec<u64> = self.connections.keys().copied().collect();
        for id in ids {
            let Some(ctx) = self.connections.get_mut(&id) else {
                continue;
            };
            let mut remove = false;
            while let Some(frame) = self.mailbox.pop_from_to_client_queue(id) {
                match ctx.write_data(frame.payload) {
                    Ok(ConnState::Alive) => {}
                    Ok(ConnState::Closed) => {
                        remove = true;
                        break;
                    }
                    Err(e) => {
                        debug!("Reactor: write on connection {id} failed: {e}");
                        remove = true;
                        break;
                    }
                }
            }
            if remove {
                self.remove_connect(id);
            } else {
                self.update_interest(id);
            }
        }
    }

    // Readiness on one client socket.
    fn socket_event(&mut self, token: Token, event: &Event) {
        let id = (token.0 - TOKEN_BASE) as u64;
        let Some(ctx) = self.connections.get_mut(&id) else {
            return;
        };

        let mut remove = false;
        let mut frames = Vec::new();
        if event.is_readable() || event.is_read_closed() {
            match ctx.read_ready(&mut frames) {
                Ok(ConnState::Alive) => {}
                Ok(ConnState::Closed) => remove = true,
                Err(e) => {
                    debug!("Reactor: read on connection {id} failed: {e}");
                    remove = true;
                }
            }
        }
        if !remove && event.is_writable() {
            match ctx.flush_pending() {
                Ok(ConnState::Alive) => {}
                Ok(ConnState::Closed) => remove = true,
                Err(e) => {
                    debug!("Reactor: flush on connection {id} failed: {e}");
                    remove = true;
                }
            }
        }
        if event.is_error() {
            remove = true;
        }

        // deliver in arrival order before any teardown
        for frame in frames {
            if let Some(tx) = &self.subscriber {
                let _ = tx.send(ReactorEvent::FrameReceived {
                    connect_id: id,
                    bytes: frame.payload.clone(),
                });
            }
            if self.mailbox.push_to_server_frame(frame).is_err() {
                // mailbox closed: shutdown is in progress
                self.running.store(false, Ordering::SeqCst);
                return;
            }
        }

        if remove {
            self.remove_connect(id);
        } else {
            self.update_interest(id);
        }
    }

    fn register_connection(
        &mut self,
        id: u64,
        mut stream: TcpStream,
        peer: SocketAddr,
    ) -> TransResult<()> {
        let token = Token(TOKEN_BASE + id as usize);
        self.poll
            .registry()
            .register(&mut stream, token, Interest::READABLE)?;
        let ctx = ConnectContext::new(id, stream, self.config.serialize().clone());
        self.connections.insert(id, ctx);
        self.mailbox.add_to_client_queue(id)?;
        debug!("Reactor: connection {id} opened, peer {peer}");
        self.publish(ReactorEvent::ConnectionOpened {
            connect_id: id,
            peer,
        });
        Ok(())
    }

    fn remove_connect(&mut self, id: u64) {
        // remove the outbound queue first: pushes for this id from now on
        // are dropped silently
        self.mailbox.remove_to_client_queue(id);
        if let Some(mut ctx) = self.connections.remove(&id) {
            if let Err(e) = self.poll.registry().deregister(ctx.stream_mut()) {
                trace!("Reactor: deregister of connection {id} failed: {e}");
            }
            debug!("Reactor: connection {id} removed");
            self.publish(ReactorEvent::ConnectionClosed { connect_id: id });
        }
        // the context drop closes the socket
    }

    // WRITABLE interest is armed exactly while a write backlog exists.
    fn update_interest(&mut self, id: u64) {
        let registry = self.poll.registry();
        let mut failed = false;
        if let Some(ctx) = self.connections.get_mut(&id) {
            let want_writable = ctx.has_pending_write();
            if want_writable != ctx.writable_armed() {
                let token = Token(TOKEN_BASE + id as usize);
                let interest = if want_writable {
                    Interest::READABLE | Interest::WRITABLE
                } else {
                    Interest::READABLE
                };
                match registry.reregister(ctx.stream_mut(), token, interest) {
                    Ok(()) => ctx.set_writable_armed(want_writable),
                    Err(e) => {
                        debug!("Reactor: reregister of connection {id} failed: {e}");
                        failed = true;
                    }
                }
            }
        }
        if failed {
            self.remove_connect(id);
        }
    }

    fn sweep_idle(&mut self) {
        let Some(timeout) = self.config.idle_timeout() else {
            return;
        };
        let stale: Vec<u64> = self
            .connections
            .iter()
            .filter(|(_, ctx)| ctx.last_activity().elapsed() > timeout)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            debug!("Reactor: connection {id} idled out");
            self.remove_connect(id);
        }
    }

    fn teardown(&mut self) {
        let ids: Vec<u64> = self.connections.keys().copied().collect();
        for id in ids {
            self.remove_connect(id);
        }
        self.mailbox.close();
    }

    fn next_connect_id(&mut self) -> u64 {
        let id = self.connect_counter;
        self.connect_counter += 1;
        id
    }

    fn publish(&self, event: ReactorEvent) {
        if let Some(tx) = &self.subscriber {
            let _ = tx.send(event);
        }
    }
}
