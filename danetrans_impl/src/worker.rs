// The worker layer: a fixed thread set draining a bounded task queue.

mod thread_pool;

pub use thread_pool::ThreadPool;
