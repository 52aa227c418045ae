//! In-memory host fakes for testing
//!
//! Embedders can enable the `tests` feature to drive a
//! [`crate::TokenSessionManager`] headlessly with these.

mod scheduler;

pub use document::{FakeDocument, FakeForm, FakeLink};
pub use page::FakePage;
pub use scheduler::ManualScheduler;

use crate::host::Clock;
use std::cell::Cell;

/// Clock frozen at a settable instant
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<i64>,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, seconds: i64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.now.get()
    }
}
