use crate::host::Scheduler;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;

type Timer = (u32, Box<dyn FnOnce()>);

/// Scheduler that only runs work when told to
#[derive(Default)]
pub struct ManualScheduler {
    timers: RefCell<Vec<Timer>>,
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays of the timers waiting to fire
    pub fn pending_delays(&self) -> Vec<u32> {
        self.timers.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Number of spawned futures not yet driven
    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Fire every pending timer, shortest delay first
    ///
    /// Returns how many fired. Timers scheduled while firing wait for the
    /// next call.
    pub fn fire_timers(&self) -> usize {
        let mut due = std::mem::take(&mut *self.timers.borrow_mut());
        due.sort_by_key(|(delay, _)| *delay);
        let fired = due.len();
        for (_, task) in due {
            task();
        }
        fired
    }

    /// Drive every spawned future to completion
    pub fn run_tasks(&self) -> usize {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let ran = tasks.len();
        for task in tasks {
            futures::executor::block_on(task);
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        self.timers.borrow_mut().push((delay_ms, task));
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(future);
    }
}
