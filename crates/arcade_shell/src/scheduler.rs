//! Deadline-ordered one-shot tasks driven by the host's clock.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct SchedulerState {
    next_id: u64,
    tasks: BTreeMap<(u64, u64), Scheduled>,
}

struct Scheduled {
    task: Task,
    pending: Rc<Cell<bool>>,
}

/// Single-threaded one-shot scheduler; clones share the queue.
#[derive(Clone, Default)]
pub struct TaskScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl TaskScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` to run at `now_ms + delay_ms`.
    ///
    /// The task is cancelled when the returned handle is cancelled or dropped.
    pub fn schedule_once(&self, now_ms: u64, delay_ms: u64, task: Box<dyn FnOnce()>) -> TaskHandle {
        let deadline = now_ms.saturating_add(delay_ms);
        let pending = Rc::new(Cell::new(true));
        let mut state = self.inner.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.tasks.insert(
            (deadline, id),
            Scheduled {
                task,
                pending: pending.clone(),
            },
        );
        tracing::debug!(id, deadline, "scheduled one-shot task");
        TaskHandle {
            key: (deadline, id),
            pending,
            scheduler: self.clone(),
        }
    }

    /// Runs every task whose deadline is at or before `now_ms`, in deadline order.
    ///
    /// Due tasks are taken off the queue before any of them runs, so tasks may schedule or cancel
    /// other tasks. Returns the number of tasks run.
    pub fn run_due(&self, now_ms: u64) -> usize {
        let due = {
            let mut state = self.inner.borrow_mut();
            let later = state.tasks.split_off(&(now_ms.saturating_add(1), 0));
            std::mem::replace(&mut state.tasks, later)
        };
        let count = due.len();
        for ((deadline, id), scheduled) in due {
            scheduled.pending.set(false);
            tracing::debug!(id, deadline, now_ms, "running one-shot task");
            (scheduled.task)();
        }
        count
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner
            .borrow()
            .tasks
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Returns whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cancel(&self, key: (u64, u64)) {
        // A task that is running already left the queue, so this never re-enters a borrow.
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            if state.tasks.remove(&key).is_some() {
                tracing::debug!(id = key.1, "cancelled one-shot task");
            }
        }
    }
}

/// Owning handle for a scheduled task; dropping it cancels the task if it has not run.
pub struct TaskHandle {
    key: (u64, u64),
    pending: Rc<Cell<bool>>,
    scheduler: TaskScheduler,
}

impl TaskHandle {
    /// Returns whether the task is still queued.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Cancels the task.
    pub fn cancel(&self) {
        if self.pending.replace(false) {
            self.scheduler.cancel(self.key);
        }
    }

    /// Deadline in unix milliseconds.
    pub fn deadline(&self) -> u64 {
        self.key.0
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("deadline", &self.key.0)
            .field("pending", &self.pending.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |label: &'static str| -> Box<dyn FnOnce()> {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(label))
        };
        (log, make)
    }

    #[test]
    fn runs_due_tasks_in_deadline_order() {
        let scheduler = TaskScheduler::new();
        let (log, make) = recorder();
        let late = scheduler.schedule_once(0, 300, make("late"));
        let early = scheduler.schedule_once(0, 100, make("early"));

        assert_eq!(scheduler.next_deadline(), Some(100));
        assert_eq!(scheduler.run_due(99), 0);
        assert_eq!(scheduler.run_due(100), 1);
        assert!(!early.is_pending());
        assert!(late.is_pending());
        assert_eq!(scheduler.run_due(1_000), 1);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn dropping_the_handle_cancels_the_task() {
        let scheduler = TaskScheduler::new();
        let (log, make) = recorder();
        let handle = scheduler.schedule_once(0, 10, make("dropped"));
        drop(handle);
        assert_eq!(scheduler.run_due(100), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn replacing_a_pending_handle_restarts_the_delay() {
        let scheduler = TaskScheduler::new();
        let (log, make) = recorder();
        let mut slot = Some(scheduler.schedule_once(0, 1_000, make("first")));
        let previous = slot.replace(scheduler.schedule_once(500, 1_000, make("second")));
        drop(previous);

        assert_eq!(scheduler.run_due(1_000), 0);
        assert_eq!(scheduler.run_due(1_500), 1);
        assert_eq!(*log.borrow(), vec!["second"]);
        assert!(slot.as_ref().is_some_and(|handle| !handle.is_pending()));
    }

    #[test]
    fn explicit_cancel_is_idempotent() {
        let scheduler = TaskScheduler::new();
        let (_log, make) = recorder();
        let handle = scheduler.schedule_once(0, 10, make("x"));
        handle.cancel();
        handle.cancel();
        assert!(!handle.is_pending());
        assert_eq!(scheduler.len(), 0);
    }
}
