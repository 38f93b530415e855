//! Fixed-size worker pool draining a FIFO task queue.
//!
//! Workers block on an unbounded `crossbeam_channel` queue; `submit` never
//! blocks the caller. Closing the queue (by dropping the sender) is the
//! shutdown signal: workers keep draining already-queued tasks and exit
//! only once the queue is empty, so shutdown means "stop accepting, finish
//! what's queued" rather than "abort in place".
//!
//! Each task runs under `catch_unwind` so one panicking task cannot take a
//! worker down with it. Trapped faults are counted and logged; callers that
//! need a per-task verdict should convert faults into their own result type
//! before the task reaches the pool (see `scanner::run_scan`).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::error;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads executing submitted tasks in FIFO order.
pub struct WorkerPool {
    /// `None` once shutdown has begun; dropping the sender closes the queue.
    task_tx: Option<Sender<Task>>,
    workers: Vec<thread::JoinHandle<()>>,
    trapped_faults: Arc<AtomicU64>,
}

impl WorkerPool {
    /// Spawn `threads` workers (clamped to at least one).
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (task_tx, task_rx) = unbounded::<Task>();
        let trapped_faults = Arc::new(AtomicU64::new(0));

        let workers = (0..threads)
            .map(|i| {
                let task_rx = task_rx.clone();
                let trapped_faults = trapped_faults.clone();
                thread::Builder::new()
                    .name(format!("elfsleuth-worker-{i}"))
                    .spawn(move || worker_loop(task_rx, trapped_faults))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            task_tx: Some(task_tx),
            workers,
            trapped_faults,
        }
    }

    /// Enqueue a task. Never blocks (unbounded queue).
    ///
    /// Tasks submitted after shutdown has begun are dropped silently; the
    /// orchestrator submits everything before draining, so this only
    /// matters for misuse.
    pub fn submit(&self, task: impl FnOnce() + Send + 'static) {
        if let Some(tx) = &self.task_tx {
            // send only fails when all receivers are gone, i.e. never
            // before shutdown.
            let _ = tx.send(Box::new(task));
        }
    }

    /// Number of tasks that panicked and were trapped at the worker
    /// boundary so far.
    pub fn trapped_faults(&self) -> u64 {
        self.trapped_faults.load(Ordering::Relaxed)
    }

    /// Stop accepting tasks, wait for every queued task to finish, and
    /// tear the pool down. Returns the total trapped-fault count.
    ///
    /// This is the deterministic join point: after it returns, every
    /// submitted task has run to completion (or panicked and been trapped).
    pub fn shutdown_and_drain(mut self) -> u64 {
        self.join_workers();
        self.trapped_faults.load(Ordering::Relaxed)
    }

    fn join_workers(&mut self) {
        // Closing the channel is the shutdown signal; recv() in the worker
        // loop errors once the queue is closed *and* empty.
        self.task_tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    /// Same drain-then-join as `shutdown_and_drain`, as a safety net for
    /// callers that drop the pool without an explicit shutdown.
    fn drop(&mut self) {
        self.join_workers();
    }
}

fn worker_loop(task_rx: Receiver<Task>, trapped_faults: Arc<AtomicU64>) {
    // recv() blocks while the queue is open, and returns Err only once the
    // queue is closed and fully drained.
    while let Ok(task) = task_rx.recv() {
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            trapped_faults.fetch_add(1, Ordering::Relaxed);
            error!("worker trapped a panicking task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn all_submitted_tasks_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(4);
        for _ in 0..100 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
        let faults = pool.shutdown_and_drain();
        assert_eq!(counter.load(Ordering::Relaxed), 100);
        assert_eq!(faults, 0);
    }

    #[test]
    fn single_worker_preserves_fifo_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let pool = WorkerPool::new(1);
        for i in 0..50 {
            let order = order.clone();
            pool.submit(move || order.lock().unwrap().push(i));
        }
        pool.shutdown_and_drain();
        let order = order.lock().unwrap();
        assert_eq!(*order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn panicking_task_does_not_kill_the_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(1);

        pool.submit(|| panic!("boom"));
        for _ in 0..10 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }

        let faults = pool.shutdown_and_drain();
        assert_eq!(counter.load(Ordering::Relaxed), 10);
        assert_eq!(faults, 1);
    }

    #[test]
    fn zero_thread_request_still_gets_one_worker() {
        let ran = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(0);
        let ran_clone = ran.clone();
        pool.submit(move || {
            ran_clone.fetch_add(1, Ordering::Relaxed);
        });
        pool.shutdown_and_drain();
        assert_eq!(ran.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn drop_without_explicit_shutdown_still_drains() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2);
            for _ in 0..20 {
                let counter = counter.clone();
                pool.submit(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                });
            }
            // pool dropped here
        }
        assert_eq!(counter.load(Ordering::Relaxed), 20);
    }
}
