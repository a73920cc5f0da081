//! XXH3 token: positions on a 2^64 ring.

use crate::token::traits::Token;
use xxhash_rust::xxh3::xxh3_64;

/// Token produced by the 64-bit XXH3 hash.
///
/// A wider ring than CRC-32 makes virtual-node collisions vanishingly rare.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Xxh3Token(pub u64);

impl Token for Xxh3Token {
    fn zero() -> Self {
        Xxh3Token(0)
    }

    fn max() -> Self {
        Xxh3Token(u64::MAX)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    fn distance_to(&self, other: &Self) -> Self {
        if other.0 >= self.0 {
            Xxh3Token(other.0 - self.0)
        } else {
            Xxh3Token((u64::MAX - self.0) + other.0 + 1)
        }
    }

    fn to_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Xxh3Token {
    /// Creates a token from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Xxh3Token(xxh3_64(data))
    }

    /// Creates a token from a string key.
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }
}
