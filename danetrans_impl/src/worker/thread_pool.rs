use crate::{TransError, TransResult};
use crossbeam_channel::{bounded, Sender};
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads draining one bounded MPMC task queue.
///
/// Producers block while the queue is full, which preserves submission order
/// and applies backpressure. Dropping the pool closes the queue and joins
/// every worker; tasks already queued still run.
#[derive(Debug)]
pub struct ThreadPool {
    task_tx: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub fn new(thread_count: usize, task_capacity: usize) -> TransResult<Self> {
        let (task_tx, task_rx) = bounded::<Task>(task_capacity);
        let mut workers = Vec::with_capacity(thread_count);
        for i in 0..thread_count {
            let rx = task_rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("trans-worker-{i}"))
                .spawn(move || {
                    while let Ok(task) = rx.recv() {
                        task();
                    }
                    trace!("ThreadPool: worker exiting, queue is closed");
                })?;
            workers.push(handle);
        }
        Ok(Self {
            task_tx: Some(task_tx),
            workers,
        })
    }

    /// Queues a task; blocks while the queue is full.
    pub fn execute<F>(&self, task: F) -> TransResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.task_tx {
            Some(tx) => tx
                .send(Box::new(task))
                .map_err(|_| TransError::MailboxClosed),
            None => Err(TransError::MailboxClosed),
        }
    }

    /// Closes the queue and waits for the workers to finish.
    pub fn stop(&mut self) {
        self.task_tx.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("ThreadPool: a worker panicked");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
    }
}
