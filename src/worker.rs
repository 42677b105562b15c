//! A small grow-on-demand thread pool for suggestion queries and learning.
//!
//! Idle workers park on their own channel; a free worker's sender sits in
//! the shared free list. Submitting a job pops a sender (or spawns a new
//! worker when none is free), and the worker re-registers itself once the
//! job finishes. The pool never shrinks; typing workloads plateau at a
//! couple of workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tracing::debug;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

pub(crate) struct WorkerPool {
    free: Arc<Mutex<Vec<mpsc::Sender<Job>>>>,
    spawned: AtomicUsize,
}

impl WorkerPool {
    pub fn new() -> Self {
        WorkerPool {
            free: Arc::new(Mutex::new(Vec::new())),
            spawned: AtomicUsize::new(0),
        }
    }

    pub fn run(&self, job: Job) {
        let idle = self.free.lock().ok().and_then(|mut free| free.pop());
        match idle {
            Some(sender) => {
                // A worker that panicked leaves a dead sender behind;
                // replace it and retry on a fresh one.
                if let Err(mpsc::SendError(job)) = sender.send(job) {
                    self.spawn_worker().send(job).ok();
                }
            }
            None => {
                self.spawn_worker().send(job).ok();
            }
        }
    }

    fn spawn_worker(&self) -> mpsc::Sender<Job> {
        let n = self.spawned.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel::<Job>();
        let free = Arc::clone(&self.free);
        let own_tx = tx.clone();
        thread::Builder::new()
            .name(format!("suggestor-{n}"))
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                    let Ok(mut free) = free.lock() else {
                        return;
                    };
                    free.push(own_tx.clone());
                }
            })
            .expect("failed to spawn suggestor worker");
        debug!(worker = n, "spawned suggestion worker");
        tx
    }

    #[cfg(test)]
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}
