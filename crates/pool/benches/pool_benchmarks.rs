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

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glimmer_pool::{GlobalQueue, ThreadPool, WorkStealingDeque};

fn bench_submit_and_await(c: &mut Criterion) {
    let pool = ThreadPool::new().unwrap();
    c.bench_function("pool_submit_await_1000", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..1000).map(|i| pool.submit(move || i)).collect();
            let total: usize = handles.iter().map(|handle| handle.get().unwrap()).sum();
            black_box(total)
        });
    });
}

fn bench_helping_drain(c: &mut Criterion) {
    // Zero workers: the submitting thread drains everything itself, which
    // isolates the queue and handle overhead from thread scheduling.
    let pool = ThreadPool::with_threads(0).unwrap();
    c.bench_function("pool_helping_drain_1000", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..1000).map(|i| pool.submit(move || i)).collect();
            for _ in 0..1000 {
                pool.run_pending_task();
            }
            let total: usize = handles.iter().map(|handle| handle.get().unwrap()).sum();
            black_box(total)
        });
    });
}

fn bench_global_queue_push_pop(c: &mut Criterion) {
    let queue = GlobalQueue::new();
    c.bench_function("global_queue_push_pop", |b| {
        b.iter(|| {
            queue.push(black_box(1_u64));
            black_box(queue.try_pop())
        });
    });
}

fn bench_deque_push_pop(c: &mut Criterion) {
    let deque = WorkStealingDeque::new();
    c.bench_function("deque_push_pop", |b| {
        b.iter(|| {
            deque.push(black_box(1_u64));
            black_box(deque.try_pop())
        });
    });
}

criterion_group!(
    benches,
    bench_submit_and_await,
    bench_helping_drain,
    bench_global_queue_push_pop,
    bench_deque_push_pop
);
criterion_main!(benches);
