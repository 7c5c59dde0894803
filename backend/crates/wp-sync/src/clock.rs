use wp_core::Cursor;

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of envelope timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Cursor;
}

/// Wall clock in milliseconds that never runs backwards within the process
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Cursor {
        let wall = Cursor::now().as_millis();
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        Cursor::from_millis(previous.max(wall))
    }
}

/// Clock that only moves when told to. Used for deterministic retention.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Cursor) -> Self {
        Self {
            now: AtomicI64::new(start.as_millis()),
        }
    }

    pub fn set(&self, now: Cursor) {
        self.now.store(now.as_millis(), Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Cursor {
        Cursor::from_millis(self.now.load(Ordering::SeqCst))
    }
}
