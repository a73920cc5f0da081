//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Changing the partitioner of a deployed ring changes the owner of nearly
/// every key, so one is chosen at construction and kept for the ring's life.
pub trait Partitioner: Send + Sync + 'static {
    /// The token type produced by this partitioner.
    type TokenType: Token;

    /// Converts a key into a token. Must be deterministic across processes.
    fn partition(&self, key: &[u8]) -> Self::TokenType;

    /// Returns the minimum token value for this partitioner.
    fn min_token(&self) -> Self::TokenType {
        Self::TokenType::zero()
    }

    /// Returns the maximum token value for this partitioner.
    fn max_token(&self) -> Self::TokenType {
        <Self::TokenType as Token>::max()
    }

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
