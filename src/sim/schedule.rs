//! Engine-owned scheduled tasks
//!
//! Interval and one-shot callbacks are plain data keyed to the session clock.
//! Every task is addressed by a `TaskHandle`, and the session cancels the
//! handles of whatever phase it tears down, so a superseded callback can never
//! fire into the next phase.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Task<T> {
    handle: TaskHandle,
    due_ms: u64,
    period_ms: Option<u64>,
    action: T,
}

/// A task taken off the schedule because its deadline passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub handle: TaskHandle,
    /// Deadline the task was due at (not the time it was popped)
    pub due_ms: u64,
    pub action: T,
}

/// Deadline-ordered task list
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_handle: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due_ms: u64, period_ms: Option<u64>, action: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(Task {
            handle,
            due_ms,
            period_ms,
            action,
        });
        handle
    }

    /// Run `action` once, `delay_ms` after `now_ms`
    pub fn once(&mut self, now_ms: u64, delay_ms: u64, action: T) -> TaskHandle {
        self.push(now_ms + delay_ms, None, action)
    }

    /// Run `action` every `period_ms`, first firing one period after `now_ms`
    pub fn every(&mut self, now_ms: u64, period_ms: u64, action: T) -> TaskHandle {
        let period_ms = period_ms.max(1);
        self.push(now_ms + period_ms, Some(period_ms), action)
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take the earliest task due at or before `now_ms`.
    ///
    /// Ties fire in scheduling order. Interval tasks are re-armed one period
    /// after their previous deadline, so a long host gap fires them once per
    /// elapsed period.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired<T>> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle))
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[idx];
        let fired = Fired {
            handle: task.handle,
            due_ms: task.due_ms,
            action: task.action.clone(),
        };
        match task.period_ms {
            Some(period) => task.due_ms += period,
            None => {
                self.tasks.swap_remove(idx);
            }
        }
        Some(fired)
    }
}
