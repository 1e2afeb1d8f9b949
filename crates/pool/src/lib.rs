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

//! Work-stealing task pool for CPU-bound workloads.
//!
//! A fixed set of worker threads each own a double-ended queue; owners pop
//! their own queue LIFO, idle workers steal FIFO from siblings, and
//! submissions from outside the pool land on a shared global FIFO. Callers
//! block on a one-shot handle for each submitted task, or keep draining
//! pending tasks themselves via [`ThreadPool::run_pending_task`] while they
//! wait.

mod deque;
pub mod error;
mod handle;
mod pool;
mod queue;
mod task;

pub use deque::*;
pub use error::*;
pub use handle::*;
pub use pool::*;
pub use queue::*;
pub use task::*;
