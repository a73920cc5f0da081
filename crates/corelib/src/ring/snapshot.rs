//! Immutable, lock-free views of a ring.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::node::RingNode;
use crate::partitioner::Partitioner;
use crate::ring::state::RingState;
use crate::vnode::VirtualNode;

/// Point-in-time view of a [`HashRing`](crate::ring::HashRing).
///
/// Mutations on the ring publish a fresh copy of its state, so a snapshot
/// keeps answering from the membership it was taken under. Cloning is cheap.
pub struct RingSnapshot<N, P: Partitioner> {
    state: Arc<RingState<N, P::TokenType>>,
    partitioner: Arc<P>,
}

impl<N, P: Partitioner> Clone for RingSnapshot<N, P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            partitioner: Arc::clone(&self.partitioner),
        }
    }
}

impl<N: RingNode, P: Partitioner> RingSnapshot<N, P> {
    pub(crate) fn new(state: Arc<RingState<N, P::TokenType>>, partitioner: Arc<P>) -> Self {
        Self { state, partitioner }
    }

    /// Node owning `key`, or `None` if the ring is empty.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<N> {
        self.locate(key).map(|vnode| vnode.node)
    }

    /// Virtual node owning `key`.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Option<VirtualNode<N, P::TokenType>> {
        let hash = self.partitioner.partition(key.as_ref());
        let found = self.state.successor(hash);
        trace!(?hash, owner = ?found, "ring lookup");
        found.map(|(token, node)| VirtualNode::new(token, node.clone()))
    }

    pub fn token_count(&self) -> usize {
        self.state.vnodes.len()
    }

    pub fn node_count(&self) -> usize {
        self.state.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.vnodes.is_empty()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.state.members.contains(node)
    }

    /// Member nodes in the order they joined.
    pub fn nodes(&self) -> Vec<N> {
        self.state.members.clone()
    }

    /// All occupied positions, ascending.
    pub fn tokens(&self) -> Vec<(P::TokenType, N)> {
        self.state.tokens()
    }

    /// Fraction of the ring owned by each member.
    pub fn ownership(&self) -> Vec<(N, f64)> {
        self.state.ownership()
    }
}

impl<N, P: Partitioner> fmt::Debug for RingSnapshot<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingSnapshot")
            .field("tokens", &self.state.vnodes.len())
            .field("nodes", &self.state.members.len())
            .field("partitioner", &self.partitioner.name())
            .finish()
    }
}
