//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens
//! that can be placed on the hash ring.

pub mod crc32;
pub mod traits;
pub mod xxh3;

pub use crc32::Crc32Partitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
