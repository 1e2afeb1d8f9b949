// Glimmer
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use crate::deque::WorkStealingDeque;
use crate::error::{PoolError, PoolResult, TaskError};
use crate::handle::{self, TaskHandle};
use crate::queue::GlobalQueue;
use crate::task::Task;

thread_local! {
    static WORKER: Cell<Option<WorkerSlot>> = const { Cell::new(None) };
}

/// Identifies the current thread as worker `index` of a particular pool.
/// Absent on threads the pool does not own, which is the signal that their
/// submissions must land on the global queue.
#[derive(Clone, Copy)]
struct WorkerSlot {
    pool: usize,
    index: usize,
}

struct Shared {
    queues: Vec<WorkStealingDeque<Task>>,
    global: GlobalQueue<Task>,
    done: AtomicBool,
}

impl Shared {
    fn id(&self) -> usize {
        self as *const Shared as usize
    }

    fn local_slot(&self) -> Option<WorkerSlot> {
        WORKER.get().filter(|slot| slot.pool == self.id())
    }

    /// The three-tier probe: local LIFO pop, then the global FIFO, then a
    /// steal sweep over the sibling deques.
    fn find_task(&self) -> Option<Task> {
        let slot = self.local_slot();
        if let Some(slot) = slot {
            if let Some(task) = self.queues[slot.index].try_pop() {
                return Some(task);
            }
        }
        if let Some(task) = self.global.try_pop() {
            return Some(task);
        }
        self.steal(slot.map(|slot| slot.index))
    }

    /// Sweeps the deques starting after `origin` so steal attempts spread
    /// across the pool instead of piling onto one victim.
    fn steal(&self, origin: Option<usize>) -> Option<Task> {
        let count = self.queues.len();
        if count == 0 {
            return None;
        }
        let start = origin.map_or(0, |index| index + 1);
        for offset in 0..count {
            let index = (start + offset) % count;
            if origin == Some(index) {
                continue;
            }
            if let Some(task) = self.queues[index].try_steal() {
                return Some(task);
            }
        }
        None
    }

    fn run_pending_task(&self) {
        match self.find_task() {
            Some(task) => task.run(),
            None => thread::yield_now(),
        }
    }
}

fn worker_loop(shared: Arc<Shared>, index: usize) {
    WORKER.set(Some(WorkerSlot {
        pool: shared.id(),
        index,
    }));
    trace!(worker = index, "worker started");
    while !shared.done.load(Ordering::Acquire) {
        shared.run_pending_task();
    }
    trace!(worker = index, "worker stopped");
}

/// Fixed-size work-stealing thread pool.
///
/// One deque per worker plus a shared global queue. Submissions from a worker
/// go onto that worker's own deque; submissions from any other thread go onto
/// the global queue. Dropping the pool signals the workers, joins them, and
/// discards any tasks still queued; their handles resolve to
/// [`TaskError::Disconnected`], so callers that depend on completion must
/// drain their handles before dropping the pool.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Pool with one worker per hardware thread (at least one).
    pub fn new() -> PoolResult<Self> {
        Self::with_threads(num_cpus::get().max(1))
    }

    /// Pool with an explicit worker count. A count of zero is valid: tasks
    /// then only run when some caller drives
    /// [`run_pending_task`](Self::run_pending_task).
    pub fn with_threads(count: usize) -> PoolResult<Self> {
        // Every deque must exist before the first worker starts. A worker
        // spawned earlier could begin its steal sweep while sibling slots are
        // still unconstructed.
        let shared = Arc::new(Shared {
            queues: (0..count).map(|_| WorkStealingDeque::new()).collect(),
            global: GlobalQueue::new(),
            done: AtomicBool::new(false),
        });

        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("glimmer-worker-{index}"))
                .spawn(move || worker_loop(worker_shared, index));
            match spawned {
                Ok(worker) => workers.push(worker),
                Err(source) => {
                    shared.done.store(true, Ordering::Release);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }
        debug!(workers = count, "thread pool started");
        Ok(Self { shared, workers })
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Submits a callable and returns the handle its result arrives on.
    ///
    /// Never blocks: the queues are unbounded. A panic inside `job` is caught
    /// by the executing worker and surfaced through the handle as
    /// [`TaskError::Panicked`]; the worker itself carries on.
    pub fn submit<F, R>(&self, job: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        debug_assert!(
            !self.shared.done.load(Ordering::Acquire),
            "submit on a pool that is shutting down"
        );
        let (promise, handle) = handle::channel();
        let task = Task::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job))
                .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
            promise.set(result);
        });
        match self.shared.local_slot() {
            Some(slot) => self.shared.queues[slot.index].push(task),
            None => self.shared.global.push(task),
        }
        handle
    }

    /// Runs one pending task if the three-tier probe finds any, else yields
    /// the scheduling quantum.
    ///
    /// This is the help-while-waiting primitive: a caller polling a
    /// [`TaskHandle`] invokes this between polls and thereby becomes a
    /// temporary worker instead of idling.
    pub fn run_pending_task(&self) {
        self.shared.run_pending_task();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.done.store(true, Ordering::Release);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        debug!("thread pool stopped");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn test_submit_from_external_thread_lands_on_global_queue() {
        let pool = ThreadPool::with_threads(0).unwrap();
        let handle = pool.submit(|| 5);
        assert!(!pool.shared.global.is_empty());
        pool.run_pending_task();
        assert_eq!(handle.get(), Ok(5));
    }

    #[test]
    fn test_submit_from_worker_lands_on_local_deque() {
        let pool = Arc::new(ThreadPool::with_threads(1).unwrap());
        let inner = Arc::clone(&pool);
        let handle = pool.submit(move || {
            // Runs on the worker; the child goes to the worker's own deque
            // and must remain runnable from here.
            let child = inner.submit(|| 21);
            loop {
                match child.wait_for(Duration::ZERO) {
                    crate::PollState::Ready => break child.get().unwrap() * 2,
                    crate::PollState::TimedOut => inner.run_pending_task(),
                }
            }
        });
        assert_eq!(handle.get(), Ok(42));
    }

    #[test]
    fn test_run_pending_task_on_idle_pool_yields() {
        let pool = ThreadPool::with_threads(0).unwrap();
        // Nothing queued; must return rather than spin or block.
        pool.run_pending_task();
    }

    #[test]
    fn test_panic_message_formats() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("kaput"));
        assert_eq!(panic_message(payload.as_ref()), "kaput");
        let payload: Box<dyn Any + Send> = Box::new(17_u32);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_worker_count_defaults_to_hardware_concurrency() {
        let pool = ThreadPool::new().unwrap();
        assert_eq!(pool.thread_count(), num_cpus::get().max(1));
        assert_eq!(pool.shared.queues.len(), pool.thread_count());
    }

    #[test]
    fn test_tasks_dropped_at_shutdown_disconnect_their_handles() {
        let pool = ThreadPool::with_threads(0).unwrap();
        let handle = pool.submit(|| 1);
        drop(pool);
        assert_eq!(handle.get(), Err(TaskError::Disconnected));
    }

    #[test]
    fn test_external_caller_steal_sweep_covers_all_deques() {
        // No workers: plant tasks directly on every deque and drive them from
        // this thread, whose sweep (origin = None) must scan every slot.
        let shared = Shared {
            queues: (0..3).map(|_| WorkStealingDeque::new()).collect(),
            global: GlobalQueue::new(),
            done: AtomicBool::new(false),
        };
        let counter = Arc::new(AtomicUsize::new(0));
        for queue in &shared.queues {
            let counter = Arc::clone(&counter);
            queue.push(Task::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for _ in 0..3 {
            shared.run_pending_task();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
