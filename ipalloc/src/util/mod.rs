mod address;
mod range;

pub use address::*;
pub use range::*;
