use std::fmt;

use spin::mutex::Mutex;
use spin::Yield;

use crate::error::Result;
use crate::freelist::FreeList;
use crate::stat::{Stats, StatsSnapshot};
use crate::util::*;

/// Thread-safe IP address allocator.
///
/// Every operation, including inspection, holds one lock over the free list
/// for its whole duration, so concurrent callers see some sequential order of
/// complete operations.
pub struct IpAlloc {
    free_list: Mutex<FreeList, Yield>,
    stats: Stats,
}

impl IpAlloc {
    pub const fn new() -> Self {
        Self {
            free_list: Mutex::new(FreeList::new()),
            stats: Stats::new(),
        }
    }

    pub fn add_range(&self, start: Address, end: Address) -> Result<()> {
        self.free_list.lock().add_range(start, end)?;
        self.stats.ranges_added.inc(1);
        Ok(())
    }

    /// Seed the pool, e.g. from configured address pools. Stops at the first
    /// rejected range; earlier ranges stay added.
    pub fn add_ranges(&self, ranges: impl IntoIterator<Item = IpRange>) -> Result<()> {
        let mut free_list = self.free_list.lock();
        for range in ranges {
            free_list.add_range(range.start, range.end)?;
            self.stats.ranges_added.inc(1);
        }
        Ok(())
    }

    pub fn remove_range(&self, start: Address, end: Address) -> bool {
        let changed = self.free_list.lock().remove_range(start, end);
        if changed {
            self.stats.ranges_removed.inc(1);
        }
        changed
    }

    pub fn get_ip(&self) -> Result<Address> {
        let result = self.free_list.lock().get_ip();
        match result {
            Ok(_) => self.stats.ips.inc(1),
            Err(_) => self.stats.exhausted.inc(1),
        }
        result
    }

    pub fn get_ip_chunk(&self) -> Result<Vec<IpRange>> {
        let result = self.free_list.lock().get_ip_chunk();
        match result {
            Ok(_) => self.stats.chunks.inc(1),
            Err(_) => self.stats.exhausted.inc(1),
        }
        result
    }

    /// Return a single address to the pool.
    pub fn release_ip(&self, ip: Address) -> Result<()> {
        self.add_range(ip, ip)
    }

    /// A copy of the current free list.
    pub fn free_list(&self) -> Vec<IpRange> {
        self.free_list.lock().ranges().to_vec()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free_list.lock().is_empty()
    }

    pub fn free_addresses_up_to(&self, limit: u64) -> u64 {
        self.free_list.lock().free_addresses_up_to(limit)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for IpAlloc {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IpAlloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpAlloc")
            .field("free_list", &*self.free_list.lock())
            .finish()
    }
}
