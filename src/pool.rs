//! Fixed-size worker thread pool with a drain barrier.
//!
//! Workers are spawned once at construction and consume a FIFO job queue.
//! [`WorkerPool::wait_idle`] blocks until the queue is empty AND no worker
//! is mid-job, which is what lets the frame orchestrator reuse per-frame
//! state the jobs were reading.
//!
//! Shutdown policy: dropping the pool wakes every worker and joins it.
//! Jobs a worker has already dequeued run to completion; jobs still queued
//! are discarded. Submissions after shutdown has begun are discarded too.
//!
//! Jobs must not panic: a panicking job takes its worker thread down and
//! the pool never recovers the in-flight slot, wedging `wait_idle`.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Everything guarded by the pool mutex.
struct State {
    queue: VecDeque<Job>,
    /// Jobs dequeued but not yet finished.
    active: usize,
    stopping: bool,
}

struct Inner {
    state: Mutex<State>,
    /// Wakes workers when a job arrives or shutdown begins.
    work_ready: Condvar,
    /// Wakes `wait_idle` callers when the last in-flight job finishes.
    all_idle: Condvar,
}

pub struct WorkerPool {
    inner: Arc<Inner>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool with one worker per detected hardware thread.
    pub fn with_default_size() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }

    /// Spawn a pool with a fixed number of workers (at least 1).
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let inner = Arc::new(Inner {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                active: 0,
                stopping: false,
            }),
            work_ready: Condvar::new(),
            all_idle: Condvar::new(),
        });

        let workers = (0..worker_count)
            .map(|i| {
                let inner = Arc::clone(&inner);
                thread::Builder::new()
                    .name(format!("softrast-worker-{i}"))
                    .spawn(move || worker_loop(&inner))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        log::debug!("worker pool started with {worker_count} threads");
        Self { inner, workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue a job. Never blocks; callable from any thread. Discarded if
    /// shutdown has already been requested.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.stopping {
                return;
            }
            state.queue.push_back(Box::new(job));
        }
        self.inner.work_ready.notify_one();
    }

    /// Block until the queue is empty and every dequeued job has finished.
    ///
    /// Returns immediately when nothing was submitted. A submission racing
    /// this call either lands before the emptiness check (we keep waiting)
    /// or after it returns; the mutex serializes the two.
    pub fn wait_idle(&self) {
        let mut state = self.inner.state.lock().unwrap();
        while !(state.queue.is_empty() && state.active == 0) {
            state = self.inner.all_idle.wait(state).unwrap();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.stopping = true;
            // Undequeued jobs are dropped; in-flight jobs still finish
            state.queue.clear();
        }
        self.inner.work_ready.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(inner: &Inner) {
    loop {
        let job = {
            let mut state = inner.state.lock().unwrap();
            loop {
                if state.stopping {
                    return;
                }
                if let Some(job) = state.queue.pop_front() {
                    state.active += 1;
                    break job;
                }
                state = inner.work_ready.wait(state).unwrap();
            }
        };

        job();

        let mut state = inner.state.lock().unwrap();
        state.active -= 1;
        if state.active == 0 && state.queue.is_empty() {
            inner.all_idle.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_wait_idle_sees_all_completions() {
        let pool = WorkerPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..1000 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.wait_idle();
        assert_eq!(counter.load(Ordering::SeqCst), 1000);
    }

    #[test]
    fn test_wait_idle_without_jobs_returns_immediately() {
        let pool = WorkerPool::new(4);
        pool.wait_idle();
    }

    #[test]
    fn test_wait_idle_covers_in_flight_jobs() {
        // A single worker sleeping in its job: wait_idle must not return
        // while the queue is empty but the job is still running
        let pool = WorkerPool::new(1);
        let done = Arc::new(AtomicUsize::new(0));
        let done_clone = Arc::clone(&done);
        pool.submit(move || {
            thread::sleep(Duration::from_millis(50));
            done_clone.store(1, Ordering::SeqCst);
        });
        pool.wait_idle();
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reusable_across_batches() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            pool.wait_idle();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 30);
    }

    #[test]
    fn test_worker_count_minimum_is_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.worker_count(), 1);
    }

    #[test]
    fn test_drop_joins_cleanly_with_pending_work() {
        let pool = WorkerPool::new(2);
        for _ in 0..100 {
            pool.submit(|| thread::sleep(Duration::from_micros(100)));
        }
        // Drop without wait_idle: dequeued jobs finish, the rest are
        // discarded, and join must not hang
        drop(pool);
    }
}
