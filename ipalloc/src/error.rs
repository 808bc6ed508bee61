use thiserror::Error;

use crate::util::{Address, AddressFamily};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `start > end`. Nothing was changed.
    #[error("Invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: Address, end: Address },

    /// Not enough free addresses for the request. Nothing was changed.
    #[error("Address pool exhausted")]
    PoolExhausted,

    /// An allocator only ever holds addresses of one length.
    #[error("Mixed address family: expected {expected}, found {found}")]
    MixedAddressFamily {
        expected: AddressFamily,
        found: AddressFamily,
    },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
