use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct Counter(AtomicUsize);

impl Counter {
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        if cfg!(not(feature = "stat")) {
            return 0;
        }
        self.0.load(Ordering::SeqCst)
    }

    #[inline(always)]
    pub fn inc(&self, delta: usize) {
        if cfg!(not(feature = "stat")) {
            return;
        }
        self.0.fetch_add(delta, Ordering::SeqCst);
    }
}

/// Per-allocator counters. Only counted with the `stat` feature.
pub(crate) struct Stats {
    pub(crate) ranges_added: Counter,
    pub(crate) ranges_removed: Counter,
    pub(crate) ips: Counter,
    pub(crate) chunks: Counter,
    pub(crate) exhausted: Counter,
}

impl Stats {
    pub(crate) const fn new() -> Self {
        Self {
            ranges_added: Counter::new(),
            ranges_removed: Counter::new(),
            ips: Counter::new(),
            chunks: Counter::new(),
            exhausted: Counter::new(),
        }
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ranges_added: self.ranges_added.get(),
            ranges_removed: self.ranges_removed.get(),
            ips: self.ips.get(),
            chunks: self.chunks.get(),
            exhausted: self.exhausted.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ranges_added: usize,
    pub ranges_removed: usize,
    pub ips: usize,
    pub chunks: usize,
    pub exhausted: usize,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ranges:")?;
        writeln!(f, " - added = {}", self.ranges_added)?;
        writeln!(f, " - removed = {}", self.ranges_removed)?;
        writeln!(f, "allocations:")?;
        writeln!(f, " - ips = {}", self.ips)?;
        writeln!(f, " - chunks = {}", self.chunks)?;
        write!(f, " - exhausted = {}", self.exhausted)
    }
}
