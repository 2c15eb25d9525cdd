//! # Tick Scheduler
//!
//! Deferred work on the host's game-loop thread. Nothing here spawns: tasks
//! only run from inside [`Scheduler::tick`], which the host calls once per
//! pass of its loop. That keeps every task on the same cooperative thread as
//! event dispatch.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Delay unit of the scheduler: one pass of the host game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);
    pub const ONE: Ticks = Ticks(1);
}

/// Future produced by one run of a scheduled task.
pub type TaskFuture = BoxFuture<'static, ()>;

type Task = Box<dyn FnMut() -> TaskFuture + Send>;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct ScheduledTask {
    id: TaskId,
    due: u64,
    period: Option<u64>,
    task: Task,
}

/// Deferred-task queue keyed on the host tick counter.
pub struct Scheduler {
    current_tick: AtomicU64,
    next_id: AtomicU64,
    queue: Mutex<Vec<ScheduledTask>>,
    /// Tasks the running tick took off the queue, mapped to whether they
    /// have been cancelled since. Empty between ticks.
    in_flight: Mutex<HashMap<TaskId, bool>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("current_tick", &self.current_tick())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            current_tick: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            queue: Mutex::new(Vec::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Number of ticks the host has completed.
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Acquire)
    }

    /// Tasks waiting to run, repeating tasks included.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Runs `task` once, `delay` ticks from now.
    ///
    /// A delay of zero still waits for the next call to [`Scheduler::tick`].
    ///
    /// # Arguments
    ///
    /// * `delay` - Ticks to wait; zero counts as one
    /// * `task` - Produces the future to run when the task is due
    ///
    /// # Returns
    ///
    /// The id to pass to [`Scheduler::cancel`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use host_event_system::{Scheduler, Ticks};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let scheduler = Scheduler::new();
    /// scheduler.run_later(Ticks(2), || {
    ///     Box::pin(async {
    ///         println!("two ticks later");
    ///     })
    /// });
    ///
    /// scheduler.tick().await;
    /// assert_eq!(scheduler.pending(), 1);
    /// scheduler.tick().await;
    /// assert_eq!(scheduler.pending(), 0);
    /// # });
    /// ```
    pub fn run_later<F>(&self, delay: Ticks, task: F) -> TaskId
    where
        F: FnOnce() -> TaskFuture + Send + 'static,
    {
        let mut once = Some(task);
        self.schedule(delay, None, move || match once.take() {
            Some(task) => task(),
            None => Box::pin(async {}),
        })
    }

    /// Runs `task` first after `delay` ticks and then every `period` ticks.
    pub fn run_repeating<F>(&self, delay: Ticks, period: Ticks, task: F) -> TaskId
    where
        F: FnMut() -> TaskFuture + Send + 'static,
    {
        self.schedule(delay, Some(period.0.max(1)), task)
    }

    /// Removes a task. Returns `false` if it was unknown or already finished.
    ///
    /// A task that is due in the running tick and has not started yet is
    /// skipped. A repeating task cancelled while it runs is not queued again.
    pub fn cancel(&self, id: TaskId) -> bool {
        {
            let mut queue = self.queue.lock();
            let before = queue.len();
            queue.retain(|task| task.id != id);
            if queue.len() != before {
                return true;
            }
        }
        match self.in_flight.lock().get_mut(&id) {
            Some(cancelled) => !std::mem::replace(cancelled, true),
            None => false,
        }
    }

    /// Advances the clock by one tick and runs every task that is due.
    ///
    /// Due tasks run in (due tick, submission) order. Tasks scheduled while
    /// this tick is running wait for a later tick.
    pub async fn tick(&self) {
        let now = self.current_tick.fetch_add(1, Ordering::AcqRel) + 1;

        let mut due = {
            let mut queue = self.queue.lock();
            let (ready, waiting): (Vec<_>, Vec<_>) =
                queue.drain(..).partition(|task| task.due <= now);
            *queue = waiting;
            ready
        };
        due.sort_by_key(|task| (task.due, task.id.0));

        if !due.is_empty() {
            trace!("⏱️ Tick {} running {} task(s)", now, due.len());
        }
        self.in_flight
            .lock()
            .extend(due.iter().map(|task| (task.id, false)));

        for mut task in due {
            let skipped = self.is_cancelled_in_flight(task.id);
            if !skipped {
                (task.task)().await;
            }

            let cancelled = self.in_flight.lock().remove(&task.id).unwrap_or(false);
            if cancelled {
                debug!("Task {:?} cancelled during tick {}", task.id, now);
                continue;
            }
            if let Some(period) = task.period {
                task.due = now + period;
                self.queue.lock().push(task);
            }
        }
    }

    fn is_cancelled_in_flight(&self, id: TaskId) -> bool {
        self.in_flight.lock().get(&id).copied().unwrap_or(false)
    }

    fn schedule<F>(&self, delay: Ticks, period: Option<u64>, task: F) -> TaskId
    where
        F: FnMut() -> TaskFuture + Send + 'static,
    {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::AcqRel));
        let due = self.current_tick() + delay.0.max(1);
        self.queue.lock().push(ScheduledTask {
            id,
            due,
            period,
            task: Box::new(task),
        });
        id
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counter_task(counter: &Arc<AtomicUsize>) -> impl FnMut() -> TaskFuture + Send + 'static {
        let counter = counter.clone();
        move || {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn run_later_waits_for_delay() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut task = counter_task(&counter);
        scheduler.run_later(Ticks(2), move || task());

        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn zero_delay_runs_on_next_tick() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut task = counter_task(&counter);
        scheduler.run_later(Ticks::ZERO, move || task());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeating_task_runs_every_period() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        scheduler.run_repeating(Ticks(1), Ticks(2), counter_task(&counter));

        for _ in 0..5 {
            scheduler.tick().await;
        }
        // ticks 1, 3, 5
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[tokio::test]
    async fn cancelled_task_never_runs() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = scheduler.run_repeating(Ticks(1), Ticks(1), counter_task(&counter));
        assert!(scheduler.cancel(id));
        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(!scheduler.cancel(id));
    }

    #[tokio::test]
    async fn cancelling_finished_or_unknown_tasks_leaves_nothing_behind() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut task = counter_task(&counter);
        let id = scheduler.run_later(Ticks(1), move || task());
        scheduler.tick().await;

        for _ in 0..3 {
            assert!(!scheduler.cancel(id));
        }
        assert!(!scheduler.cancel(TaskId(999)));
        assert!(scheduler.in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn task_cancelled_earlier_in_the_same_tick_is_skipped() {
        let scheduler = Arc::new(Scheduler::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let victim = Arc::new(Mutex::new(None));

        let (canceller, target) = (scheduler.clone(), victim.clone());
        scheduler.run_later(Ticks(1), move || {
            Box::pin(async move {
                if let Some(id) = *target.lock() {
                    assert!(canceller.cancel(id));
                }
            })
        });
        let id = scheduler.run_repeating(Ticks(1), Ticks(1), counter_task(&counter));
        *victim.lock() = Some(id);

        scheduler.tick().await;
        scheduler.tick().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn repeating_task_can_cancel_itself() {
        let scheduler = Arc::new(Scheduler::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let (handle, id_slot, runs) = (scheduler.clone(), own_id.clone(), counter.clone());
        let id = scheduler.run_repeating(Ticks(1), Ticks(1), move || {
            let (handle, id_slot, runs) = (handle.clone(), id_slot.clone(), runs.clone());
            Box::pin(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *id_slot.lock() {
                    handle.cancel(id);
                }
            })
        });
        *own_id.lock() = Some(id);

        for _ in 0..3 {
            scheduler.tick().await;
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }
}
