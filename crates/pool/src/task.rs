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

use std::fmt;

/// A pending unit of work: a type-erased, move-only callable that is consumed
/// by execution.
///
/// Tasks are not clonable. The promise behind a submitted task has exactly one
/// consumer, so duplicating the callable would create two producers racing to
/// fulfill it. Dropping an unexecuted task is legal and simply drops the
/// captured state.
pub struct Task {
    job: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    pub fn new<F>(job: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { job: Box::new(job) }
    }

    /// Runs the callable exactly once, consuming the task.
    pub fn run(self) {
        (self.job)();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_task_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = {
            let counter = Arc::clone(&counter);
            Task::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        };
        task.run();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_unexecuted_task_drops_captured_state() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = {
            let counter = Arc::clone(&counter);
            Task::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        };
        drop(task);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(Arc::strong_count(&counter), 1);
    }
}
