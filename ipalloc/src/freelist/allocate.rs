use tracing::debug;

use super::FreeList;
use crate::error::{Error, Result};
use crate::util::*;

/// Number of addresses handed out by one chunk allocation, before rounding up
/// to the next 256-address boundary.
pub const CHUNK_SIZE: u64 = 256;

impl FreeList {
    /// Allocate the lowest free address.
    pub fn get_ip(&mut self) -> Result<Address> {
        let first = self.ranges.first_mut().ok_or(Error::PoolExhausted)?;
        let ip = first.start;
        if first.is_single() {
            self.ranges.remove(0);
        } else {
            first.start = first.start.increment().0;
        }
        debug!(%ip, "allocated ip");
        self.verify();
        Ok(ip)
    }

    /// Allocate at least [`CHUNK_SIZE`] addresses from the bottom of the free
    /// list. The returned ranges are the ones consumed, in ascending order.
    ///
    /// The last range is extended up to the next address ending in `0xFF`
    /// (or the end of its free range) so that whatever stays free starts on a
    /// 256-address boundary.
    pub fn get_ip_chunk(&mut self) -> Result<Vec<IpRange>> {
        if self.free_addresses_up_to(CHUNK_SIZE) < CHUNK_SIZE {
            return Err(Error::PoolExhausted);
        }
        let mut chunk = Vec::new();
        let mut needed = CHUNK_SIZE;
        for range in &self.ranges {
            let size = range.size_up_to(needed);
            if size < needed {
                chunk.push(*range);
                needed -= size;
                continue;
            }
            let (last, overflow) = range.start.offset(needed - 1);
            debug_assert!(!overflow && last <= range.end);
            let end = if last.low_byte() == 0xFF {
                last
            } else {
                last.with_low_byte(0xFF).min(range.end)
            };
            chunk.push(IpRange {
                start: range.start,
                end,
            });
            break;
        }
        for range in &chunk {
            self.remove_range(range.start, range.end);
        }
        debug!(?chunk, "allocated chunk");
        Ok(chunk)
    }
}
