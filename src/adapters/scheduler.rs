//! Scheduler adapters.
//!
//! `ManualScheduler` is a deterministic clock for tests: nothing fires
//! until `advance` moves time forward. `TokioScheduler` (feature `web`)
//! backs the server with real timers.

use crate::ports::scheduler_port::{SchedulerPort, Task, TimerHandle};
use std::sync::{Mutex, PoisonError};

struct PendingTask {
    handle: TimerHandle,
    due_ms: u64,
    task: Task,
}

struct ManualState {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Deterministic scheduler driven by explicit time advancement.
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualState {
                now_ms: 0,
                next_id: 1,
                pending: Vec::new(),
            }),
        }
    }

    /// Move the clock forward and run every task that came due, in due
    /// order. Tasks run outside the lock so they may schedule again.
    pub fn advance(&self, delta_ms: u64) {
        let due = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.now_ms += delta_ms;
            let now = state.now_ms;

            let mut due: Vec<PendingTask> = Vec::new();
            let mut remaining: Vec<PendingTask> = Vec::new();
            for pending in state.pending.drain(..) {
                if pending.due_ms <= now {
                    due.push(pending);
                } else {
                    remaining.push(pending);
                }
            }
            state.pending = remaining;
            due.sort_by_key(|p| p.due_ms);
            due
        };

        for pending in due {
            (pending.task)();
        }
    }

    /// Number of tasks still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerPort for ManualScheduler {
    fn schedule(&self, delay_ms: u64, task: Task) -> TimerHandle {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = TimerHandle(state.next_id);
        state.next_id += 1;
        let due_ms = state.now_ms + delay_ms;
        state.pending.push(PendingTask {
            handle,
            due_ms,
            task,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.retain(|p| p.handle != handle);
    }
}

#[cfg(feature = "web")]
pub use tokio_scheduler::TokioScheduler;

#[cfg(feature = "web")]
mod tokio_scheduler {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Real timers on the tokio runtime; cancel aborts the sleeping task.
    pub struct TokioScheduler {
        next_id: AtomicU64,
        tasks: Mutex<HashMap<u64, tokio::task::JoinHandle<()>>>,
    }

    impl TokioScheduler {
        pub fn new() -> Self {
            Self {
                next_id: AtomicU64::new(1),
                tasks: Mutex::new(HashMap::new()),
            }
        }
    }

    impl Default for TokioScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SchedulerPort for TokioScheduler {
        fn schedule(&self, delay_ms: u64, task: Task) -> TimerHandle {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let join = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                task();
            });

            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.retain(|_, handle| !handle.is_finished());
            tasks.insert(id, join);
            TimerHandle(id)
        }

        fn cancel(&self, handle: TimerHandle) {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(join) = tasks.remove(&handle.0) {
                join.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn nothing_fires_before_due() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        scheduler.schedule(500, counter_task(&fired));

        scheduler.advance(499);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.advance(1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(100, counter_task(&fired));

        scheduler.cancel(handle);
        scheduler.advance(200);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_after_fire_is_a_noop() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(100, counter_task(&fired));

        scheduler.advance(100);
        scheduler.cancel(handle);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn due_tasks_fire_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (delay, label) in [(300u64, "late"), (100, "early"), (200, "mid")] {
            let order = Arc::clone(&order);
            scheduler.schedule(
                delay,
                Box::new(move || {
                    order
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(label);
                }),
            );
        }

        scheduler.advance(300);
        let seen = order.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(seen, vec!["early", "mid", "late"]);
    }

    #[test]
    fn tasks_may_reschedule_during_advance() {
        let scheduler = Arc::new(ManualScheduler::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let inner_scheduler = Arc::clone(&scheduler);
        let inner_fired = Arc::clone(&fired);
        scheduler.schedule(
            100,
            Box::new(move || {
                inner_fired.fetch_add(1, Ordering::SeqCst);
                inner_scheduler.schedule(
                    100,
                    counter_task(&inner_fired),
                );
            }),
        );

        scheduler.advance(100);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        scheduler.advance(100);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
