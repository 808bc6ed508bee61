use std::fmt;
use std::str::FromStr;

use super::{Address, AddressFamily};
use crate::error::{Error, Result};

/// Inclusive interval `[start, end]` of addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpRange {
    pub start: Address,
    pub end: Address,
}

impl IpRange {
    pub fn new(start: Address, end: Address) -> Result<Self> {
        if start.family() != end.family() {
            return Err(Error::MixedAddressFamily {
                expected: start.family(),
                found: end.family(),
            });
        }
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline(always)]
    pub const fn single(addr: Address) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    #[inline(always)]
    pub const fn family(&self) -> AddressFamily {
        self.start.family()
    }

    #[inline(always)]
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, addr: &Address) -> bool {
        addr.family() == self.family() && self.start <= *addr && *addr <= self.end
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Overlapping or adjacent, i.e. the union of the two is one range.
    pub fn overlaps_or_touches(&self, other: &Self) -> bool {
        self.intersects(other)
            || self.end.is_adjacent_to(&other.start)
            || other.end.is_adjacent_to(&self.start)
    }

    /// Number of addresses in the range, capped at `limit`.
    pub fn size_up_to(&self, limit: u64) -> u64 {
        self.end.distance(&self.start).saturating_add(1).min(limit)
    }
}

impl FromStr for IpRange {
    type Err = Error;

    /// `start-end`, or a single address.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('-') {
            Some((start, end)) => Self::new(start.parse()?, end.parse()?),
            None => Ok(Self::single(s.parse()?)),
        }
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl fmt::Debug for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.start, self.end)
    }
}
