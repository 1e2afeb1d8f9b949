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

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A worker's private double-ended queue.
///
/// The owning worker pushes and pops at the front, so its most recent
/// submission runs first while the touched data is still warm. Thieves take
/// from the back, which keeps them off the owner's end and hands them the
/// oldest queued work. Only the owning worker may call [`push`](Self::push)
/// and [`try_pop`](Self::try_pop); anyone may call
/// [`try_steal`](Self::try_steal).
///
/// All operations hold the mutex for O(1).
pub struct WorkStealingDeque<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> WorkStealingDeque<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Owner side: inserts at the front.
    pub fn push(&self, value: T) {
        self.items.lock().push_front(value);
    }

    /// Owner side: removes from the front (LIFO).
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Thief side: removes from the back (FIFO).
    pub fn try_steal(&self) -> Option<T> {
        self.items.lock().pop_back()
    }

    /// Advisory; the deque may be drained between this check and the next
    /// locked operation.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> Default for WorkStealingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}
