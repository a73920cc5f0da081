//! Hash ring data structure.
//!
//! `HashRing` keeps a `BTreeMap<Token, Node>` behind a `parking_lot::RwLock`.
//! Writers (`add`, `remove`) clone-on-write the map through `Arc::make_mut`,
//! so readers holding a [`RingSnapshot`] are never blocked and never see a
//! half-applied mutation.
//!
//! # Collisions
//!
//! Two virtual nodes of different physical nodes can hash to the same
//! position. The later insertion wins and the earlier owner silently loses
//! that slot. `add` reports how many positions it took this way, and a
//! `warn` event is emitted for each one.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::node::{Node, RingNode};
use crate::partitioner::{Crc32Partitioner, Partitioner};
use crate::ring::snapshot::RingSnapshot;
use crate::ring::state::RingState;
use crate::vnode::{vnode_token, VirtualNode};

/// Virtual nodes per node when none is configured.
pub const DEFAULT_VNODES_PER_NODE: usize = 200;

/// Outcome of [`HashRing::add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Positions that were free and are now owned by the node.
    pub inserted: usize,
    /// Positions the node already owned (re-add of an existing member).
    pub already_present: usize,
    /// Positions taken over from a different node.
    pub displaced: usize,
}

impl AddReport {
    /// Positions the node owns as a result of this call.
    pub fn owned(&self) -> usize {
        self.inserted + self.already_present + self.displaced
    }
}

/// Consistent hash ring mapping keys to nodes.
pub struct HashRing<N = Node, P: Partitioner = Crc32Partitioner> {
    vnodes_per_node: usize,
    partitioner: Arc<P>,
    state: RwLock<Arc<RingState<N, P::TokenType>>>,
}

impl<N: RingNode> HashRing<N, Crc32Partitioner> {
    /// Create a CRC-32 ring with `vnodes_per_node` positions per node,
    /// adding `nodes` in order.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `vnodes_per_node` is 0.
    pub fn new(vnodes_per_node: usize, nodes: impl IntoIterator<Item = N>) -> Result<Self> {
        Self::with_partitioner(vnodes_per_node, Crc32Partitioner, nodes)
    }
}

impl<N: RingNode, P: Partitioner> HashRing<N, P> {
    /// Create a ring that places keys and virtual nodes with `partitioner`.
    pub fn with_partitioner(
        vnodes_per_node: usize,
        partitioner: P,
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<Self> {
        if vnodes_per_node == 0 {
            return Err(Error::InvalidConfiguration(
                "vnodes_per_node must be positive".into(),
            ));
        }

        let ring = Self {
            vnodes_per_node,
            partitioner: Arc::new(partitioner),
            state: RwLock::new(Arc::new(RingState::default())),
        };
        for node in nodes {
            ring.add(node);
        }
        Ok(ring)
    }

    /// Place `node`'s virtual nodes on the ring.
    ///
    /// Adding a node that is already a member is idempotent: its positions
    /// are recomputed, the ones it still owns are left alone, and any it lost
    /// to a collision are taken back.
    pub fn add(&self, node: N) -> AddReport {
        let tokens = self.vnode_tokens(&node);
        let mut report = AddReport::default();

        let mut guard = self.state.write();
        let state = Arc::make_mut(&mut guard);
        let was_member = state.members.contains(&node);
        for token in tokens {
            match state.vnodes.insert(token, node.clone()) {
                None => report.inserted += 1,
                // Two replicas of a new node hashing alike is not a re-add.
                Some(previous) if previous == node => {
                    if was_member {
                        report.already_present += 1;
                    }
                }
                Some(previous) => {
                    warn!(?token, displaced = ?previous, owner = ?node, "virtual node collision");
                    report.displaced += 1;
                }
            }
        }
        if !was_member {
            state.members.push(node.clone());
        }
        drop(guard);

        debug!(
            ?node,
            inserted = report.inserted,
            already_present = report.already_present,
            displaced = report.displaced,
            "added node to ring"
        );
        report
    }

    /// Take `node` off the ring and return how many positions were freed.
    ///
    /// Only positions currently owned by `node` are deleted; a slot it lost
    /// to a collision stays with the winner. Removing a node that is not a
    /// member does nothing.
    pub fn remove(&self, node: &N) -> usize {
        let tokens = self.vnode_tokens(node);

        let mut guard = self.state.write();
        if !guard.members.contains(node) {
            return 0;
        }
        let state = Arc::make_mut(&mut guard);
        let mut removed = 0;
        for token in tokens {
            if state.vnodes.get(&token) == Some(node) {
                state.vnodes.remove(&token);
                removed += 1;
            }
        }
        state.members.retain(|member| member != node);
        drop(guard);

        debug!(?node, removed, "removed node from ring");
        removed
    }

    /// Node owning `key`: the first position clockwise from `hash(key)`.
    ///
    /// Returns `None` only when the ring has no positions.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<N> {
        self.snapshot().get(key)
    }

    /// Virtual node owning `key`.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Option<VirtualNode<N, P::TokenType>> {
        self.snapshot().locate(key)
    }

    /// Ring position of `key`.
    pub fn hash(&self, key: impl AsRef<[u8]>) -> P::TokenType {
        self.partitioner.partition(key.as_ref())
    }

    /// Current state as an immutable view that ignores later mutations.
    pub fn snapshot(&self) -> RingSnapshot<N, P> {
        let state = Arc::clone(&self.state.read());
        RingSnapshot::new(state, Arc::clone(&self.partitioner))
    }

    pub fn vnodes_per_node(&self) -> usize {
        self.vnodes_per_node
    }

    pub fn node_count(&self) -> usize {
        self.state.read().members.len()
    }

    pub fn token_count(&self) -> usize {
        self.state.read().vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().vnodes.is_empty()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.state.read().members.contains(node)
    }

    /// Member nodes in the order they joined.
    pub fn nodes(&self) -> Vec<N> {
        self.state.read().members.clone()
    }

    /// All occupied positions, ascending.
    pub fn tokens(&self) -> Vec<(P::TokenType, N)> {
        self.state.read().tokens()
    }

    /// Fraction of the ring owned by each member, for skew monitoring.
    pub fn ownership(&self) -> Vec<(N, f64)> {
        self.snapshot().ownership()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    fn vnode_tokens(&self, node: &N) -> Vec<P::TokenType> {
        (0..self.vnodes_per_node)
            .map(|i| vnode_token(node, i, self.partitioner.as_ref()))
            .collect()
    }
}

impl<N, P: Partitioner> fmt::Debug for HashRing<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("vnodes_per_node", &self.vnodes_per_node)
            .field("partitioner", &self.partitioner.name())
            .field("nodes", &state.members.len())
            .field("tokens", &state.vnodes.len())
            .finish()
    }
}

/// Builder for [`HashRing`].
///
/// ```rust
/// use corelib::{Node, RingBuilder};
///
/// let ring = RingBuilder::new()
///     .with_vnodes(64)
///     .add_node(Node::new("10.0.0.1"))
///     .add_node(Node::new("10.0.0.2"))
///     .build()
///     .unwrap();
/// assert_eq!(ring.token_count(), 128);
/// ```
#[derive(Debug)]
pub struct RingBuilder<N = Node, P = Crc32Partitioner> {
    vnodes_per_node: usize,
    partitioner: P,
    nodes: Vec<N>,
}

impl<N: RingNode> RingBuilder<N, Crc32Partitioner> {
    pub fn new() -> Self {
        Self {
            vnodes_per_node: DEFAULT_VNODES_PER_NODE,
            partitioner: Crc32Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl<N: RingNode> Default for RingBuilder<N, Crc32Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: RingNode, P: Partitioner> RingBuilder<N, P> {
    pub fn with_vnodes(mut self, vnodes_per_node: usize) -> Self {
        self.vnodes_per_node = vnodes_per_node;
        self
    }

    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<N, Q> {
        RingBuilder {
            vnodes_per_node: self.vnodes_per_node,
            partitioner,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node: N) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> Result<HashRing<N, P>> {
        HashRing::with_partitioner(self.vnodes_per_node, self.partitioner, self.nodes)
    }
}
