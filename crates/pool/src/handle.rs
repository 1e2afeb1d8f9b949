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

use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{TaskError, TaskResult};

/// Result of a non-destructive poll on a [`TaskHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Ready,
    TimedOut,
}

enum State<T> {
    Pending,
    Ready(TaskResult<T>),
    Taken,
}

struct Channel<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

/// Producer half of a one-shot result channel. Written at most once, by the
/// worker that executes the task.
pub struct Promise<T> {
    channel: Option<Arc<Channel<T>>>,
}

/// Consumer half of a one-shot result channel, returned from task submission.
///
/// The value is read at most once; a second [`get`](TaskHandle::get) reports
/// [`TaskError::AlreadyTaken`]. If the producer is dropped without writing
/// (e.g. the pool discarded the task at shutdown), the handle resolves to
/// [`TaskError::Disconnected`] instead of blocking forever.
pub struct TaskHandle<T> {
    channel: Arc<Channel<T>>,
}

/// Creates a connected promise/handle pair.
pub fn channel<T>() -> (Promise<T>, TaskHandle<T>) {
    let channel = Arc::new(Channel {
        state: Mutex::new(State::Pending),
        ready: Condvar::new(),
    });
    (
        Promise {
            channel: Some(Arc::clone(&channel)),
        },
        TaskHandle { channel },
    )
}

impl<T> Promise<T> {
    /// Fulfills the promise, waking the consumer. Consumes the promise; the
    /// producer side is single-shot.
    pub fn set(mut self, result: TaskResult<T>) {
        if let Some(channel) = self.channel.take() {
            Self::resolve(&channel, result);
        }
    }

    fn resolve(channel: &Channel<T>, result: TaskResult<T>) {
        let mut state = channel.state.lock();
        if matches!(*state, State::Pending) {
            *state = State::Ready(result);
            channel.ready.notify_all();
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        // An abandoned promise must not strand its consumer.
        if let Some(channel) = self.channel.take() {
            Self::resolve(&channel, Err(TaskError::Disconnected));
        }
    }
}

impl<T> TaskHandle<T> {
    /// Blocks until the task completes, then takes the value or the captured
    /// failure out of the channel.
    pub fn get(&self) -> TaskResult<T> {
        let mut state = self.channel.state.lock();
        while matches!(*state, State::Pending) {
            self.channel.ready.wait(&mut state);
        }
        match mem::replace(&mut *state, State::Taken) {
            State::Ready(result) => result,
            _ => Err(TaskError::AlreadyTaken),
        }
    }

    /// Waits up to `timeout` for the task to complete without consuming the
    /// value. A zero timeout is a pure poll.
    pub fn wait_for(&self, timeout: Duration) -> PollState {
        // A timeout too large to represent as a deadline waits indefinitely.
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.channel.state.lock();
        while matches!(*state, State::Pending) {
            match deadline {
                Some(deadline) => {
                    if self.channel.ready.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
                None => self.channel.ready.wait(&mut state),
            }
        }
        match *state {
            State::Pending => PollState::TimedOut,
            _ => PollState::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_returns_value_set_before_wait() {
        let (promise, handle) = channel();
        promise.set(Ok(42));
        assert_eq!(handle.get(), Ok(42));
    }

    #[test]
    fn test_get_blocks_until_producer_sets() {
        let (promise, handle) = channel();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            promise.set(Ok("done"));
        });
        assert_eq!(handle.get(), Ok("done"));
        producer.join().unwrap();
    }

    #[test]
    fn test_second_get_reports_already_taken() {
        let (promise, handle) = channel();
        promise.set(Ok(1));
        assert_eq!(handle.get(), Ok(1));
        assert_eq!(handle.get(), Err::<i32, _>(TaskError::AlreadyTaken));
    }

    #[test]
    fn test_wait_for_times_out_while_pending() {
        let (promise, handle) = channel::<i32>();
        assert_eq!(handle.wait_for(Duration::ZERO), PollState::TimedOut);
        assert_eq!(handle.wait_for(Duration::from_millis(5)), PollState::TimedOut);
        promise.set(Ok(7));
        assert_eq!(handle.wait_for(Duration::ZERO), PollState::Ready);
        // The poll is non-destructive; the value is still there.
        assert_eq!(handle.get(), Ok(7));
    }

    #[test]
    fn test_dropped_promise_resolves_to_disconnected() {
        let (promise, handle) = channel::<i32>();
        drop(promise);
        assert_eq!(handle.get(), Err(TaskError::Disconnected));
    }

    #[test]
    fn test_dropping_handle_does_not_block_producer() {
        let (promise, handle) = channel();
        drop(handle);
        promise.set(Ok(9));
    }

    #[test]
    fn test_set_wins_over_drop() {
        let (promise, handle) = channel();
        promise.set(Ok(3));
        assert_eq!(handle.get(), Ok(3));
    }
}
