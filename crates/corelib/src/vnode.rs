//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical node having a single token on the ring, each node
//! has `V` tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//!
//! # Placement
//!
//! Replica `i` of a node sits at `partition(stable_bytes(node) ++ "#" ++ "i")`:
//! the node's bytes, a `#`, then the decimal index. So node `10.0.0.1` places
//! replica 12 at the hash of `10.0.0.1#12`. The separator keeps placement
//! inputs distinct across nodes: without it, `10.0.0.1` replica 12 and
//! `10.0.0.11` replica 2 would hash the same string.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(V) per node
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: roughly 1/N of keys move when a node joins/leaves

use std::fmt;

use crate::node::StableBytes;
use crate::partitioner::Partitioner;
use crate::token::Token;

/// A virtual node on the hash ring: one token position owned by a physical
/// node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode<N, T> {
    /// Token position on the ring.
    pub token: T,
    /// The physical node that owns this virtual node.
    pub node: N,
}

impl<N, T: Token> VirtualNode<N, T> {
    #[inline]
    pub fn new(token: T, node: N) -> Self {
        Self { token, node }
    }

    /// Place replica `vnode_index` of `node` using `partitioner`.
    pub fn from_index<P>(node: N, vnode_index: usize, partitioner: &P) -> Self
    where
        N: StableBytes,
        P: Partitioner<TokenType = T>,
    {
        let token = vnode_token(&node, vnode_index, partitioner);
        Self::new(token, node)
    }

    #[inline]
    pub fn token(&self) -> T {
        self.token
    }

    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> T {
        self.token.distance_to(&other.token)
    }
}

/// Byte between a node's identity and its replica index.
const VNODE_SEPARATOR: u8 = b'#';

/// Token of replica `vnode_index` of `node`.
pub(crate) fn vnode_token<N, P>(node: &N, vnode_index: usize, partitioner: &P) -> P::TokenType
where
    N: StableBytes + ?Sized,
    P: Partitioner,
{
    let identity = node.stable_bytes();
    let index = vnode_index.to_string();
    let mut key = Vec::with_capacity(identity.len() + 1 + index.len());
    key.extend_from_slice(&identity);
    key.push(VNODE_SEPARATOR);
    key.extend_from_slice(index.as_bytes());
    partitioner.partition(&key)
}

impl<N: fmt::Display, T: fmt::Debug> fmt::Display for VirtualNode<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(token={:?}, node={})", self.token, self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::partitioner::Crc32Partitioner;
    use crate::token::Crc32Token;

    #[test]
    fn test_vnode_from_index() {
        let vnode0 = VirtualNode::from_index(Node::new("10.0.0.1"), 0, &Crc32Partitioner);
        let vnode1 = VirtualNode::from_index(Node::new("10.0.0.1"), 1, &Crc32Partitioner);

        assert_ne!(vnode0.token(), vnode1.token());
        assert_eq!(vnode0.node(), vnode1.node());
    }

    #[test]
    fn test_vnode_key_separates_index() {
        let vnode = VirtualNode::from_index("10.0.0.1", 12, &Crc32Partitioner);
        assert_eq!(vnode.token(), Crc32Token::from_key("10.0.0.1#12"));
    }

    #[test]
    fn test_prefix_addresses_get_distinct_positions() {
        // "10.0.0.1" replica 12 and "10.0.0.11" replica 2 must not share input.
        let short = VirtualNode::from_index("10.0.0.1", 12, &Crc32Partitioner);
        let long = VirtualNode::from_index("10.0.0.11", 2, &Crc32Partitioner);
        assert_ne!(short.token(), long.token());
    }

    #[test]
    fn test_vnode_distance() {
        let a = VirtualNode::new(Crc32Token(100), "a");
        let b = VirtualNode::new(Crc32Token(200), "b");
        assert_eq!(a.distance_to(&b), Crc32Token(100));
        assert_eq!(b.distance_to(&a), Crc32Token(u32::MAX - 99));
    }

    #[test]
    fn test_vnode_display() {
        let vnode = VirtualNode::new(Crc32Token(7), Node::new("10.0.0.1"));
        assert_eq!(vnode.to_string(), "VNode(token=Crc32Token(7), node=10.0.0.1)");
    }
}
