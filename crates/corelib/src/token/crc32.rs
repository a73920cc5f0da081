//! CRC-32 token: positions on a 2^32 ring.

use crate::token::traits::Token;

/// Token produced by the CRC-32 (IEEE) checksum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Crc32Token(pub u32);

impl Token for Crc32Token {
    fn zero() -> Self {
        Crc32Token(0)
    }

    fn max() -> Self {
        Crc32Token(u32::MAX)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 == u32::MAX
    }

    fn distance_to(&self, other: &Self) -> Self {
        Crc32Token(other.0.wrapping_sub(self.0))
    }

    fn to_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl Crc32Token {
    /// Creates a token from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Crc32Token(crc32fast::hash(data))
    }

    /// Creates a token from a string key.
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksum() {
        // Standard CRC-32 check value.
        assert_eq!(Crc32Token::from_key("123456789"), Crc32Token(0xCBF4_3926));
    }

    #[test]
    fn test_distance_wraps() {
        assert_eq!(Crc32Token(100).distance_to(&Crc32Token(250)), Crc32Token(150));
        assert_eq!(Crc32Token(u32::MAX).distance_to(&Crc32Token(4)), Crc32Token(5));
    }

    #[test]
    fn test_bounds() {
        assert!(Crc32Token::zero().is_zero());
        assert!(<Crc32Token as Token>::max().is_max());
        assert_eq!(Crc32Token::ring_size(), 4_294_967_296.0);
    }
}
