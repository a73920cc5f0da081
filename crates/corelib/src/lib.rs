//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Token types and partitioners (CRC-32 by default, XXH3 for a wider ring)
//! - Node identity and virtual node placement
//! - The hash ring itself, with copy-on-write snapshots for readers
//! - Serializable ring configuration

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod vnode;

pub use config::{PartitionerKind, RingConfig};
pub use error::{Error, Result};
pub use node::{Node, RingNode, StableBytes};
pub use partitioner::Partitioner;
pub use ring::{AddReport, HashRing, Ring, RingBuilder, RingSnapshot};
pub use token::Token;
pub use vnode::VirtualNode;
