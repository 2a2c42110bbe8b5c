use super::TransService;
use crate::conn::ReactorConfiguration;
use crate::reactor::{ReactorEventLoop, ReactorHandle, ReactorMailBox};
use crate::worker::ThreadPool;
use crate::{TransError, TransResult};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Wires the server pieces together: one reactor thread, a worker pool
/// draining the inbound mailbox through a [`TransService`], and the mailbox
/// connecting them.
#[derive(Debug)]
pub struct TransServer {
    mailbox: Arc<ReactorMailBox>,
    reactor_handle: ReactorHandle,
    reactor_thread: Option<JoinHandle<TransResult<()>>>,
    // dropped last; its drop joins the workers once the mailbox is closed
    _pool: ThreadPool,
    local_addr: SocketAddr,
}

impl TransServer {
    /// Binds `addr`, starts the reactor thread and the worker pool, and
    /// returns once the server accepts connections.
    ///
    /// Bind to port 0 to let the OS pick; the effective address is available
    /// through [`local_addr`](Self::local_addr).
    pub fn start(
        addr: SocketAddr,
        service: TransService,
        config: ReactorConfiguration,
    ) -> TransResult<Self> {
        let mailbox = Arc::new(ReactorMailBox::new(config.inbound_queue_capacity()));
        let mut reactor =
            ReactorEventLoop::new_server(addr, Arc::clone(&mailbox), config.clone())?;
        let local_addr = reactor
            .local_addr()
            .ok_or(TransError::Impl("listener has no local address"))?;
        let reactor_handle = reactor.handle();
        let reactor_thread = std::thread::Builder::new()
            .name("trans-reactor".to_string())
            .spawn(move || reactor.run())?;

        let pool = ThreadPool::new(config.worker_count(), config.worker_count())?;
        let service = Arc::new(service);
        for _ in 0..config.worker_count() {
            let mailbox = Arc::clone(&mailbox);
            let service = Arc::clone(&service);
            pool.execute(move || {
                while let Ok(frame) = mailbox.pop_from_to_server_frame() {
                    if let Some(response) = service.handle_frame(&frame) {
                        if mailbox.push_to_client_frame(response).is_err() {
                            break;
                        }
                    }
                }
                trace!("TransServer: worker loop ends, mailbox is closed");
            })?;
        }

        info!("TransServer: serving on {local_addr}");
        Ok(Self {
            mailbox,
            reactor_handle,
            reactor_thread: Some(reactor_thread),
            _pool: pool,
            local_addr,
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The mailbox, e.g. for pushing server-initiated frames.
    pub fn mailbox(&self) -> &Arc<ReactorMailBox> {
        &self.mailbox
    }

    /// Stops the reactor, which closes the mailbox and thereby ends the
    /// worker loops; waits for the reactor thread.
    pub fn stop(mut self) -> TransResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> TransResult<()> {
        self.reactor_handle.stop();
        if let Some(thread) = self.reactor_thread.take() {
            thread
                .join()
                .map_err(|_| TransError::Impl("reactor thread panicked"))??;
        }
        Ok(())
    }
}

impl Drop for TransServer {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("TransServer: shutdown while dropping failed: {e}");
        }
    }
}
