use crate::protocol::SerializeConfig;
use std::time::Duration;

// docu is written at the re-export of the frontend crate (danetrans/lib.rs)
#[derive(Debug, Clone)]
pub struct ReactorConfiguration {
    worker_count: usize,
    inbound_queue_capacity: usize,
    max_events: usize,
    idle_timeout: Option<Duration>,
    serialize: SerializeConfig,
}

impl Default for ReactorConfiguration {
    fn default() -> Self {
        Self {
            worker_count: Self::DEFAULT_WORKER_COUNT,
            inbound_queue_capacity: Self::DEFAULT_INBOUND_QUEUE_CAPACITY,
            max_events: Self::DEFAULT_MAX_EVENTS,
            idle_timeout: None,
            serialize: SerializeConfig::default(),
        }
    }
}
impl ReactorConfiguration {
    /// Default number of worker threads draining the inbound mailbox.
    pub const DEFAULT_WORKER_COUNT: usize = 4;

    /// Default capacity of the bounded inbound queue.
    ///
    /// When the queue is full the reactor stops pulling from sockets until a
    /// worker pops, which propagates backpressure to the peers.
    pub const DEFAULT_INBOUND_QUEUE_CAPACITY: usize = 128;

    /// Default capacity of the readiness-event buffer of one poll round.
    pub const DEFAULT_MAX_EVENTS: usize = 1024;

    /// Returns the number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
    /// Sets the number of worker threads.
    pub fn set_worker_count(&mut self, count: usize) {
        self.worker_count = count;
    }
    /// Builder-method for setting the number of worker threads.
    #[must_use]
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Returns the capacity of the bounded inbound queue.
    pub fn inbound_queue_capacity(&self) -> usize {
        self.inbound_queue_capacity
    }
    /// Sets the capacity of the bounded inbound queue.
    pub fn set_inbound_queue_capacity(&mut self, capacity: usize) {
        self.inbound_queue_capacity = capacity;
    }
    /// Builder-method for setting the capacity of the bounded inbound queue.
    #[must_use]
    pub fn with_inbound_queue_capacity(mut self, capacity: usize) -> Self {
        self.inbound_queue_capacity = capacity;
        self
    }

    /// Returns the capacity of the readiness-event buffer.
    pub fn max_events(&self) -> usize {
        self.max_events
    }
    /// Builder-method for setting the capacity of the readiness-event buffer.
    #[must_use]
    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    /// Returns the idle timeout after which a silent connection is removed.
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }
    /// Sets the idle timeout after which a silent connection is removed.
    ///
    /// `None` (the default) keeps silent connections forever.
    pub fn set_idle_timeout(&mut self, timeout: Option<Duration>) {
        self.idle_timeout = timeout;
    }
    /// Builder-method for setting the idle timeout.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Returns the wire-level limits and options.
    pub fn serialize(&self) -> &SerializeConfig {
        &self.serialize
    }
    /// Builder-method for setting the wire-level limits and options.
    #[must_use]
    pub fn with_serialize(mut self, serialize: SerializeConfig) -> Self {
        self.serialize = serialize;
        self
    }
}
