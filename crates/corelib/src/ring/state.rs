//! Ordered position map shared by the live ring and its snapshots.

use std::collections::BTreeMap;

use crate::token::Token;

/// Ring contents: every occupied position and the set of member nodes.
///
/// A node stays a member from `add` until `remove` even if collisions have
/// taken all of its positions.
#[derive(Debug, Clone)]
pub(crate) struct RingState<N, T> {
    pub(crate) vnodes: BTreeMap<T, N>,
    pub(crate) members: Vec<N>,
}

impl<N, T> Default for RingState<N, T> {
    fn default() -> Self {
        Self {
            vnodes: BTreeMap::new(),
            members: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq, T: Token> RingState<N, T> {
    /// Clockwise successor of `token`: the first position `>= token`,
    /// wrapping to the lowest position when `token` is past the last one.
    pub(crate) fn successor(&self, token: T) -> Option<(T, &N)> {
        self.vnodes
            .range(token..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(t, n)| (*t, n))
    }

    pub(crate) fn tokens(&self) -> Vec<(T, N)> {
        self.vnodes.iter().map(|(t, n)| (*t, n.clone())).collect()
    }

    /// Fraction of the ring owned by each member.
    ///
    /// A position owns the arc from its predecessor (exclusive) up to itself
    /// (inclusive). Fractions sum to 1.0 for a non-empty ring.
    pub(crate) fn ownership(&self) -> Vec<(N, f64)> {
        let mut shares: Vec<(N, f64)> = self.members.iter().map(|m| (m.clone(), 0.0)).collect();

        let Some((&last, last_owner)) = self.vnodes.iter().next_back() else {
            return shares;
        };
        if self.vnodes.len() == 1 {
            if let Some(share) = shares.iter_mut().find(|(m, _)| m == last_owner) {
                share.1 = 1.0;
            }
            return shares;
        }

        let ring_size = T::ring_size();
        let mut prev = last;
        for (token, owner) in &self.vnodes {
            let arc = prev.distance_to(token).to_f64() / ring_size;
            if let Some(share) = shares.iter_mut().find(|(m, _)| m == owner) {
                share.1 += arc;
            }
            prev = *token;
        }
        shares
    }
}
