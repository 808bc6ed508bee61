//! Free-list IP address management.
//!
//! [`IpAlloc`] tracks the free addresses of one IPv4 or IPv6 pool as a
//! canonical list of inclusive ranges, and hands them out one address at a
//! time ([`IpAlloc::get_ip`]) or in 256-address chunks
//! ([`IpAlloc::get_ip_chunk`]).

pub mod allocator;
pub mod error;
pub mod freelist;
pub mod stat;
pub mod util;

pub use allocator::IpAlloc;
pub use error::{Error, Result};
pub use freelist::{FreeList, CHUNK_SIZE};
pub use stat::StatsSnapshot;
pub use util::*;
