//! Node abstractions for the consistent hash ring.
//!
//! The ring never interprets node identity. It only needs to compare nodes and
//! to turn each one into a stable byte string, which seeds the positions of
//! its virtual nodes. That byte string must not change while the node is on
//! the ring, otherwise `remove` recomputes different positions than `add` did.

use std::borrow::Cow;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable byte rendering of a node identity, used as hash input.
pub trait StableBytes {
    fn stable_bytes(&self) -> Cow<'_, [u8]>;
}

impl StableBytes for str {
    fn stable_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl StableBytes for String {
    fn stable_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl<T: StableBytes + ?Sized> StableBytes for &T {
    fn stable_bytes(&self) -> Cow<'_, [u8]> {
        (**self).stable_bytes()
    }
}

/// Everything the ring requires of a node type.
///
/// Blanket-implemented; callers never implement this directly.
pub trait RingNode: StableBytes + Clone + Eq + Debug + Send + Sync + 'static {}

impl<T> RingNode for T where T: StableBytes + Clone + Eq + Debug + Send + Sync + 'static {}

/// Backend node identified by its address (e.g. `10.0.0.1`).
///
/// Keep this struct small and cheap to clone; connections and other mutable
/// state belong to the caller.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    address: String,
}

impl Node {
    /// Construct a node from an address without validation.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Construct a node, rejecting addresses that are empty or padded with
    /// whitespace.
    pub fn parse(address: &str) -> Result<Self> {
        if address.is_empty() {
            return Err(Error::InvalidNode("address is empty".into()));
        }
        if address.trim() != address {
            return Err(Error::InvalidNode(format!(
                "address {:?} has surrounding whitespace",
                address
            )));
        }
        Ok(Self::new(address))
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl StableBytes for Node {
    fn stable_bytes(&self) -> Cow<'_, [u8]> {
        self.address.stable_bytes()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl From<&str> for Node {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}
