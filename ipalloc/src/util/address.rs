use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    #[inline(always)]
    pub const fn bytes(&self) -> usize {
        match self {
            Self::V4 => 4,
            Self::V6 => 16,
        }
    }

    #[inline(always)]
    const fn from_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(Self::V4),
            16 => Some(Self::V6),
            _ => None,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IP address as a fixed-length big-endian unsigned integer.
///
/// Only the first `family().bytes()` bytes are significant. The rest are kept
/// zeroed so that derived equality and hashing stay exact.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    family: AddressFamily,
    bytes: [u8; Address::MAX_BYTES],
}

impl Address {
    pub const MAX_BYTES: usize = 16;

    #[inline(always)]
    fn with_family(family: AddressFamily, src: &[u8]) -> Self {
        debug_assert_eq!(family.bytes(), src.len());
        let mut bytes = [0u8; Self::MAX_BYTES];
        bytes[..src.len()].copy_from_slice(src);
        Self { family, bytes }
    }

    /// Returns `None` unless `bytes` is 4 or 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let family = AddressFamily::from_len(bytes.len())?;
        Some(Self::with_family(family, bytes))
    }

    #[inline(always)]
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.family.bytes()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    #[inline(always)]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.bytes[..len]
    }

    /// Add one, propagating the carry towards the most significant byte.
    /// Wraps to zero and reports `true` when every byte was `0xFF`.
    pub fn increment(&self) -> (Self, bool) {
        let mut result = *self;
        for byte in result.as_bytes_mut().iter_mut().rev() {
            let (value, carry) = byte.overflowing_add(1);
            *byte = value;
            if !carry {
                return (result, false);
            }
        }
        (result, true)
    }

    /// Subtract one, propagating the borrow towards the most significant byte.
    /// Wraps to all-`0xFF` and reports `true` when every byte was zero.
    pub fn decrement(&self) -> (Self, bool) {
        let mut result = *self;
        for byte in result.as_bytes_mut().iter_mut().rev() {
            let (value, borrow) = byte.overflowing_sub(1);
            *byte = value;
            if !borrow {
                return (result, false);
            }
        }
        (result, true)
    }

    /// Add `n`, one byte at a time. Reports `true` if the sum wrapped.
    pub fn offset(&self, n: u64) -> (Self, bool) {
        let mut result = *self;
        let mut rest = n;
        for byte in result.as_bytes_mut().iter_mut().rev() {
            if rest == 0 {
                return (result, false);
            }
            let sum = *byte as u64 + (rest & 0xFF);
            *byte = sum as u8;
            rest = (rest >> 8) + (sum >> 8);
        }
        (result, rest != 0)
    }

    /// `self - lower`, saturating at `u64::MAX`.
    pub fn distance(&self, lower: &Self) -> u64 {
        debug_assert_eq!(self.family, lower.family);
        debug_assert!(self >= lower);
        let len = self.len();
        let mut diff = [0u8; Self::MAX_BYTES];
        let mut borrow = false;
        for i in (0..len).rev() {
            let (value, b0) = self.bytes[i].overflowing_sub(lower.bytes[i]);
            let (value, b1) = value.overflowing_sub(borrow as u8);
            diff[i] = value;
            borrow = b0 || b1;
        }
        let split = len.saturating_sub(8);
        if diff[..split].iter().any(|b| *b != 0) {
            return u64::MAX;
        }
        diff[split..len]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | *b as u64)
    }

    #[inline(always)]
    pub fn low_byte(&self) -> u8 {
        self.bytes[self.len() - 1]
    }

    #[inline(always)]
    pub fn with_low_byte(&self, value: u8) -> Self {
        let mut result = *self;
        let len = result.len();
        result.bytes[len - 1] = value;
        result
    }

    /// True if `next` immediately follows `self`, with no wrap-around.
    #[inline]
    pub fn is_adjacent_to(&self, next: &Self) -> bool {
        let (succ, overflow) = self.increment();
        !overflow && succ == *next
    }
}

impl PartialOrd for Address {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self::with_family(AddressFamily::V4, &ip.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self::with_family(AddressFamily::V6, &ip.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => ip.into(),
            IpAddr::V6(ip) => ip.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> IpAddr {
        match addr.family {
            AddressFamily::V4 => {
                let b = &addr.bytes;
                IpAddr::V4(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::from(addr.bytes)),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<IpAddr>()
            .map(Self::from)
            .map_err(|_| Error::InvalidAddress(s.to_owned()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&IpAddr::from(*self), f)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
