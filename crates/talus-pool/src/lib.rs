//! A generic worker thread pool with non-blocking-pollable task handles.
//!
//! The manager and physics step need to submit work and later ask "is it
//! done yet" without an async runtime in the dependency graph; a
//! `crossbeam::channel` oneshot per task gives exactly that without paying
//! for `tokio`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A handle to a submitted task's eventual result.
pub struct TaskHandle<T> {
    rx: Receiver<T>,
}

/// Outcome of a non-blocking poll of a [`TaskHandle`].
pub enum PollResult<T> {
    /// The task has not finished yet.
    Pending(TaskHandle<T>),
    /// The task finished and produced a value.
    Ready(T),
    /// The task's worker dropped its sender without sending — it panicked
    /// or the pool was torn down before the task ran.
    Failed,
}

impl<T> TaskHandle<T> {
    /// Polls without blocking. Consumes `self`; the pending case hands it
    /// back so the caller can keep it around for the next tick.
    pub fn try_poll(self) -> PollResult<T> {
        match self.rx.try_recv() {
            Ok(value) => PollResult::Ready(value),
            Err(TryRecvError::Empty) => PollResult::Pending(self),
            Err(TryRecvError::Disconnected) => PollResult::Failed,
        }
    }

    /// Blocks until the task completes or its worker drops without sending.
    pub fn join(self) -> Option<T> {
        self.rx.recv().ok()
    }
}

/// A pool of `N` worker threads draining a shared FIFO job queue.
pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl ThreadPool {
    /// Spawns `num_threads` workers (minimum 1).
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        let (sender, receiver) = channel::unbounded::<Job>();
        let stopped = Arc::new(AtomicBool::new(false));

        let workers = (0..num_threads)
            .map(|id| {
                let receiver = receiver.clone();
                std::thread::Builder::new()
                    .name(format!("talus-pool-{id}"))
                    .spawn(move || {
                        for job in receiver {
                            job();
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
            stopped,
        }
    }

    /// Submits `f` for execution and returns a handle to its result.
    ///
    /// # Panics
    /// Panics if called after [`ThreadPool::shutdown`] — submitting to a
    /// stopped pool is a caller bug, not a recoverable runtime condition.
    pub fn submit<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        assert!(
            !self.stopped.load(Ordering::Acquire),
            "submit on a stopped ThreadPool"
        );
        let (tx, rx) = channel::bounded(1);
        let sender = self
            .sender
            .as_ref()
            .expect("sender present while pool is not stopped");
        let job: Job = Box::new(move || {
            let result = f();
            // Ignore send failure: the caller dropped the handle, result is
            // simply discarded.
            let _ = tx.send(result);
        });
        sender.send(job).expect("worker threads outlive the pool");
        TaskHandle { rx }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Drains pending tasks, then joins every worker. Further `submit`
    /// calls panic after this returns.
    pub fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.sender.take(); // closes the channel, workers drain then exit
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("talus-pool worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if self.sender.is_some() {
            self.shutdown();
        }
    }
}
