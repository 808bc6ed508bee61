use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::util::*;

/// Free address ranges, kept canonical after every mutation: sorted by start,
/// non-overlapping, and never adjacent.
#[derive(Clone, Default)]
pub struct FreeList {
    pub(super) ranges: Vec<IpRange>,
    /// Fixed by the first range ever added.
    family: Option<AddressFamily>,
}

impl FreeList {
    pub const fn new() -> Self {
        Self {
            ranges: Vec::new(),
            family: None,
        }
    }

    #[inline(always)]
    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline(always)]
    pub const fn family(&self) -> Option<AddressFamily> {
        self.family
    }

    pub fn contains(&self, addr: &Address) -> bool {
        let i = self.ranges.partition_point(|r| r.end < *addr);
        self.ranges.get(i).map_or(false, |r| r.contains(addr))
    }

    /// Total number of free addresses, capped at `limit`.
    pub fn free_addresses_up_to(&self, limit: u64) -> u64 {
        let mut total = 0u64;
        for range in &self.ranges {
            if total >= limit {
                break;
            }
            total += range.size_up_to(limit - total);
        }
        total
    }

    fn check_family(&self, found: AddressFamily) -> Result<()> {
        match self.family {
            Some(expected) if expected != found => {
                Err(Error::MixedAddressFamily { expected, found })
            }
            _ => Ok(()),
        }
    }

    /// Add `[start, end]` to the free list, coalescing it with every range it
    /// overlaps or touches.
    pub fn add_range(&mut self, start: Address, end: Address) -> Result<()> {
        let range = IpRange::new(start, end)?;
        self.check_family(range.family())?;
        self.family = Some(range.family());
        // Ranges in `lo..hi` overlap or touch `range`. Everything before `lo`
        // ends strictly before it with a gap, and ends are sorted.
        let lo = self
            .ranges
            .partition_point(|r| r.end < range.start && !r.end.is_adjacent_to(&range.start));
        let hi = lo
            + self.ranges[lo..]
                .iter()
                .take_while(|r| r.overlaps_or_touches(&range))
                .count();
        let merged = self.ranges[lo..hi].iter().fold(range, |acc, r| IpRange {
            start: acc.start.min(r.start),
            end: acc.end.max(r.end),
        });
        if hi - lo > 0 {
            trace!(%range, %merged, bridged = hi - lo, "coalesced");
        }
        self.ranges.splice(lo..hi, Some(merged));
        debug!(%range, ranges = self.ranges.len(), "added range");
        self.verify();
        Ok(())
    }

    /// Remove `[start, end]` from the free list. Returns `false` when no free
    /// address was in the range.
    pub fn remove_range(&mut self, start: Address, end: Address) -> bool {
        let range = match IpRange::new(start, end) {
            Ok(range) => range,
            Err(e) => {
                warn!(%start, %end, "remove_range rejected: {}", e);
                return false;
            }
        };
        if let Err(e) = self.check_family(range.family()) {
            warn!(%range, "remove_range rejected: {}", e);
            return false;
        }
        let lo = self.ranges.partition_point(|r| r.end < range.start);
        let hi = lo
            + self.ranges[lo..]
                .iter()
                .take_while(|r| r.start <= range.end)
                .count();
        if lo == hi {
            return false;
        }
        // Only the first and last intersecting ranges can stick out of `range`.
        let first = self.ranges[lo];
        let last = self.ranges[hi - 1];
        let mut kept = Vec::with_capacity(2);
        if first.start < range.start {
            let (end, overflow) = range.start.decrement();
            debug_assert!(!overflow);
            kept.push(IpRange {
                start: first.start,
                end,
            });
        }
        if last.end > range.end {
            let (start, overflow) = range.end.increment();
            debug_assert!(!overflow);
            kept.push(IpRange {
                start,
                end: last.end,
            });
        }
        trace!(%range, removed = hi - lo, kept = kept.len(), "split");
        self.ranges.splice(lo..hi, kept);
        debug!(%range, ranges = self.ranges.len(), "removed range");
        self.verify();
        true
    }

    /// Sorted, non-overlapping, non-adjacent, and of a single family.
    pub fn is_canonical(&self) -> bool {
        self.ranges
            .iter()
            .all(|r| r.start <= r.end && Some(r.family()) == self.family)
            && self
                .ranges
                .windows(2)
                .all(|w| w[0].end < w[1].start && !w[0].end.is_adjacent_to(&w[1].start))
    }

    #[inline(always)]
    pub(super) fn verify(&self) {
        if cfg!(feature = "slow_assert") {
            debug_assert!(self.is_canonical(), "{:?}", self);
        }
    }
}

impl fmt::Debug for FreeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.ranges).finish()
    }
}
