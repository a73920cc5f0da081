//! CRC-32 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::crc32::Crc32Token;

/// CRC-32 partitioner, the ring's default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    type TokenType = Crc32Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        Crc32Token::from_bytes(key)
    }

    fn name(&self) -> &'static str {
        "Crc32Partitioner"
    }
}
