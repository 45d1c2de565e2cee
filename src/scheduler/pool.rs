//! Worker threads for the offload discipline.
//!
//! Jobs go onto a `crossbeam_channel` MPMC queue shared by every worker
//! thread. Each job carries the sending half of a `oneshot`; the caller holds
//! the receiving half as a [`StepHandle`] future.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

use futures_channel::oneshot;

use crate::error::DigestError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads.
///
/// Cloning is cheap; clones share the same threads. The threads exit once
/// every clone has been dropped and the queue is drained.
///
/// # Example
///
/// ```
/// use stepdigest::WorkerPool;
///
/// let pool = WorkerPool::new(1)?;
/// let answer = futures_executor::block_on(pool.execute(|| 6 * 7))?;
/// assert_eq!(answer, 42);
/// # Ok::<(), stepdigest::DigestError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WorkerPool {
    threads: usize,
    sender: crossbeam_channel::Sender<Job>,
}

impl WorkerPool {
    /// Starts `threads` worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfig`] for zero threads and
    /// [`DigestError::Io`] if the OS refuses to spawn a thread.
    pub fn new(threads: usize) -> Result<Self, DigestError> {
        if threads == 0 {
            return Err(DigestError::InvalidConfig {
                message: "worker pool needs at least one thread",
            });
        }

        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        for i in 0..threads {
            let receiver = receiver.clone();
            thread::Builder::new()
                .name(format!("stepdigest-worker-{}", i))
                .spawn(move || {
                    // `recv` fails once every sender is gone.
                    while let Ok(job) = receiver.recv() {
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            log::warn!("offloaded step panicked");
                        }
                    }
                })?;
        }

        log::debug!("started worker pool with {} threads", threads);
        Ok(Self { threads, sender })
    }

    /// Returns the number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs `job` on a worker thread.
    ///
    /// The returned handle resolves to the job's output, or to
    /// [`DigestError::WorkerLost`] if the job panicked.
    pub fn execute<F, T>(&self, job: F) -> StepHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            // The receiver may be gone if the awaiting task was dropped.
            let _ = tx.send(job());
        });

        // Unreachable while workers hold the receiver; a failed send drops
        // the job and its `tx`, so the handle still resolves.
        if self.sender.send(job).is_err() {
            log::warn!("worker pool queue closed");
        }

        StepHandle { rx }
    }
}

/// The pending result of a job submitted to a [`WorkerPool`].
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct StepHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for StepHandle<T> {
    type Output = Result<T, DigestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| DigestError::WorkerLost))
    }
}
