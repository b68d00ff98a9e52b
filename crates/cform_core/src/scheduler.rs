//! Deferred task scheduler
//!
//! A cooperative, single-threaded queue of one-shot tasks. The owner of a
//! [`TaskScheduler`] advances it explicitly with [`TaskScheduler::tick`];
//! widgets receive a weak [`SchedulerHandle`] to schedule and cancel work.
//!
//! A task deferred during tick `n` runs during tick `n + 1` at the
//! earliest, which is what a zero-delay timer means on an event loop: the
//! current turn completes (and the presentation is flushed) before the task
//! re-enters.
//!
//! ```rust
//! use cform_core::scheduler::TaskScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let scheduler = TaskScheduler::new();
//! let handle = scheduler.handle();
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! let id = handle.defer(move || flag.set(true)).unwrap();
//! assert!(handle.is_pending(id));
//!
//! assert_eq!(scheduler.tick(), 1);
//! assert!(fired.get());
//! assert!(!handle.is_pending(id));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled task
    pub struct TaskId;
}

/// A one-shot deferred task
pub type Task = Box<dyn FnOnce()>;

struct ScheduledTask {
    /// Tick on which the task becomes due
    due: u64,
    /// Scheduling order, used to keep FIFO among tasks due on the same tick
    seq: u64,
    task: Task,
}

struct SchedulerInner {
    tasks: SlotMap<TaskId, ScheduledTask>,
    current_tick: u64,
    next_seq: u64,
}

impl SchedulerInner {
    fn insert(&mut self, delay_ticks: u64, task: Task) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(ScheduledTask {
            due: self.current_tick + delay_ticks.max(1),
            seq,
            task,
        })
    }
}

/// Owner of the deferred task queue
///
/// Dropping the scheduler drops every pending task without running it;
/// outstanding handles then become inert.
pub struct TaskScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                current_tick: 0,
                next_seq: 0,
            })),
        }
    }

    /// Get a weak handle for scheduling tasks
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advance the clock by one tick and run every task that became due
    ///
    /// Tasks run outside of the scheduler borrow, so they may schedule or
    /// cancel further tasks. Anything they schedule lands on a later tick.
    /// Returns the number of tasks that ran.
    pub fn tick(&self) -> usize {
        let mut due: Vec<ScheduledTask> = {
            let mut inner = self.inner.borrow_mut();
            inner.current_tick += 1;
            let now = inner.current_tick;

            let ready: Vec<TaskId> = inner
                .tasks
                .iter()
                .filter(|(_, scheduled)| scheduled.due <= now)
                .map(|(id, _)| id)
                .collect();

            ready
                .into_iter()
                .filter_map(|id| inner.tasks.remove(id))
                .collect()
        };

        due.sort_by_key(|scheduled| scheduled.seq);

        let ran = due.len();
        for scheduled in due {
            (scheduled.task)();
        }

        if ran > 0 {
            tracing::trace!(ran, "scheduler tick");
        }
        ran
    }

    /// Number of tasks waiting to run
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }
}

impl fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TaskScheduler")
            .field("pending", &inner.tasks.len())
            .field("current_tick", &inner.current_tick)
            .finish()
    }
}

/// A weak handle to the task scheduler
///
/// This is passed to widgets that need deferred work.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Run `task` on the next tick
    ///
    /// Returns `None` if the scheduler has been dropped.
    pub fn defer<F>(&self, task: F) -> Option<TaskId>
    where
        F: FnOnce() + 'static,
    {
        self.schedule(1, task)
    }

    /// Run `task` after `delay_ticks` ticks (0 behaves like 1)
    pub fn schedule<F>(&self, delay_ticks: u64, task: F) -> Option<TaskId>
    where
        F: FnOnce() + 'static,
    {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().insert(delay_ticks, Box::new(task)))
    }

    /// Cancel a pending task
    ///
    /// Returns `false` if the task already ran, was already cancelled, or
    /// the scheduler is gone.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().tasks.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check whether a task is still waiting to run
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().tasks.contains_key(id))
            .unwrap_or(false)
    }

    /// Number of tasks waiting to run
    pub fn pending_count(&self) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().tasks.len())
            .unwrap_or(0)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let count = Rc::new(Cell::new(0));
        let shared = count.clone();
        let make = move || {
            let c = shared.clone();
            Box::new(move || c.set(c.get() + 1)) as Box<dyn FnOnce()>
        };
        (count, make)
    }

    #[test]
    fn test_deferred_task_runs_on_next_tick_only() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, make) = counter();

        handle.defer(make());
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.pending_count(), 1);

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.tick(), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, make) = counter();

        let id = handle.defer(make()).unwrap();
        assert!(handle.cancel(id));
        assert!(!handle.cancel(id));

        scheduler.tick();
        assert_eq!(count.get(), 0);
        assert_eq!(handle.pending_count(), 0);
    }

    #[test]
    fn test_delayed_schedule() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, make) = counter();

        handle.schedule(3, make());
        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.get(), 0);
        scheduler.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_zero_delay_behaves_like_defer() {
        let scheduler = TaskScheduler::new();
        let (count, make) = counter();

        scheduler.handle().schedule(0, make());
        assert_eq!(count.get(), 0);
        scheduler.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_tasks_run_in_scheduling_order() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..5 {
            let sink = log.clone();
            handle.defer(move || sink.borrow_mut().push(i));
        }
        scheduler.tick();

        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_task_scheduled_from_task_lands_on_later_tick() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, make) = counter();

        let inner_handle = handle.clone();
        handle.defer(move || {
            inner_handle.defer(make());
        });

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.tick(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_handle_outlives_scheduler() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, make) = counter();

        let id = handle.defer(make()).unwrap();
        drop(scheduler);

        assert!(!handle.is_alive());
        assert!(handle.defer(make()).is_none());
        assert!(!handle.cancel(id));
        assert!(!handle.is_pending(id));
        assert_eq!(count.get(), 0);
    }
}
