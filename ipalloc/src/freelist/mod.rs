mod allocate;
pub mod range_freelist;

pub use allocate::CHUNK_SIZE;
pub use range_freelist::*;
