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

use std::ptr;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Unbounded MPMC FIFO with fine-grained locking, used for submissions that
/// do not originate on a worker thread.
///
/// The representation is a singly-linked list ending in a dummy sentinel
/// node. `head` and `tail` are guarded by independent mutexes: a push only
/// touches the node `tail` points at (the current sentinel), a pop only frees
/// nodes strictly before the tail snapshot, so producers and consumers do not
/// contend on the same lock in the common case.
///
/// Invariants: `head == tail` iff the queue is logically empty (the sentinel
/// always remains); every node before the sentinel carries a value; the list
/// is acyclic. Lock order is head before tail; push takes only the tail lock.
pub struct GlobalQueue<T> {
    head: Mutex<*mut Node<T>>,
    tail: Mutex<*mut Node<T>>,
    available: Condvar,
}

struct Node<T> {
    value: Option<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn sentinel() -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            value: None,
            next: ptr::null_mut(),
        }))
    }
}

// The raw pointers are owned by the queue and only dereferenced under the
// respective locks.
unsafe impl<T: Send> Send for GlobalQueue<T> {}
unsafe impl<T: Send> Sync for GlobalQueue<T> {}

impl<T> GlobalQueue<T> {
    pub fn new() -> Self {
        let sentinel = Node::sentinel();
        Self {
            head: Mutex::new(sentinel),
            tail: Mutex::new(sentinel),
            available: Condvar::new(),
        }
    }

    /// Appends a value. Never blocks beyond the tail lock.
    pub fn push(&self, value: T) {
        let new_sentinel = Node::sentinel();
        {
            let mut tail = self.tail.lock();
            // The value lands in the current sentinel before the new tail is
            // published, so a pop that already observed head != tail always
            // finds the data in place.
            unsafe {
                (**tail).value = Some(value);
                (**tail).next = new_sentinel;
            }
            *tail = new_sentinel;
        }
        self.available.notify_one();
    }

    /// Detaches the head value if the queue is non-empty.
    pub fn try_pop(&self) -> Option<T> {
        let mut head = self.head.lock();
        self.pop_head(&mut head)
    }

    /// Blocks until a value is available.
    pub fn pop(&self) -> T {
        let mut head = self.head.lock();
        loop {
            if let Some(value) = self.pop_head(&mut head) {
                return value;
            }
            // push notifies without taking the head lock, so a notification
            // can land between the emptiness check above and the sleep; the
            // bounded wait turns that window into a re-check.
            self.available.wait_for(&mut head, Duration::from_millis(10));
        }
    }

    pub fn is_empty(&self) -> bool {
        let head = self.head.lock();
        *head == self.tail_snapshot()
    }

    fn tail_snapshot(&self) -> *mut Node<T> {
        *self.tail.lock()
    }

    fn pop_head(&self, head: &mut *mut Node<T>) -> Option<T> {
        if *head == self.tail_snapshot() {
            return None;
        }
        // head != tail, so the head node carries a value and its next pointer
        // is already linked.
        let old_head = *head;
        unsafe {
            *head = (*old_head).next;
            Box::from_raw(old_head).value
        }
    }
}

impl<T> Default for GlobalQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GlobalQueue<T> {
    fn drop(&mut self) {
        let mut node = *self.head.get_mut();
        while !node.is_null() {
            node = unsafe { Box::from_raw(node) }.next;
        }
    }
}
