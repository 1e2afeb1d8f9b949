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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to spawn worker thread {index}: {source}")]
    Spawn { index: usize, source: std::io::Error },
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Failure of a single task, surfaced through its [`TaskHandle`].
///
/// [`TaskHandle`]: crate::TaskHandle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task was dropped before producing a value")]
    Disconnected,

    #[error("Task result was already taken")]
    AlreadyTaken,
}

pub type TaskResult<T> = Result<T, TaskError>;
