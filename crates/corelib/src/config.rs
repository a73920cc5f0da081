//! Serializable ring configuration.
//!
//! ```json
//! { "vnodes_per_node": 200, "partitioner": "crc32", "nodes": ["10.0.0.1", "10.0.0.2"] }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::partitioner::Partitioner;
use crate::ring::{HashRing, DEFAULT_VNODES_PER_NODE};

/// Hash function used to place keys and virtual nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionerKind {
    #[default]
    Crc32,
    Xxh3,
}

/// Ring parameters and initial membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    pub vnodes_per_node: usize,
    pub partitioner: PartitionerKind,
    pub nodes: Vec<String>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes_per_node: DEFAULT_VNODES_PER_NODE,
            partitioner: PartitionerKind::default(),
            nodes: Vec::new(),
        }
    }
}

impl RingConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vnodes_per_node == 0 {
            return Err(Error::InvalidConfiguration(
                "vnodes_per_node must be positive".into(),
            ));
        }
        self.parsed_nodes().map(|_| ())
    }

    /// Build a ring of the configured nodes using `partitioner`.
    ///
    /// The partitioner is passed in because its token type is part of the
    /// ring's type; callers dispatch on [`PartitionerKind`].
    pub fn build_with<P: Partitioner>(&self, partitioner: P) -> Result<HashRing<Node, P>> {
        let nodes = self.parsed_nodes()?;
        HashRing::with_partitioner(self.vnodes_per_node, partitioner, nodes)
    }

    fn parsed_nodes(&self) -> Result<Vec<Node>> {
        self.nodes.iter().map(|n| Node::parse(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::{Crc32Partitioner, Xxh3Partitioner};

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = RingConfig::from_json(r#"{ "nodes": ["10.0.0.1"] }"#).unwrap();
        assert_eq!(config.vnodes_per_node, 200);
        assert_eq!(config.partitioner, PartitionerKind::Crc32);
        assert_eq!(config.nodes, vec!["10.0.0.1".to_string()]);
    }

    #[test]
    fn test_zero_vnodes_rejected() {
        let err = RingConfig::from_json(r#"{ "vnodes_per_node": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_negative_vnodes_rejected() {
        let err = RingConfig::from_json(r#"{ "vnodes_per_node": -5 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_node_rejected() {
        let err = RingConfig::from_json(r#"{ "nodes": ["10.0.0.1", ""] }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidNode(_)));
    }

    #[test]
    fn test_unknown_partitioner_rejected() {
        assert!(RingConfig::from_json(r#"{ "partitioner": "md5" }"#).is_err());
    }

    #[test]
    fn test_build_rings() {
        let config = RingConfig {
            vnodes_per_node: 16,
            partitioner: PartitionerKind::Xxh3,
            nodes: vec!["10.0.0.1".into(), "10.0.0.2".into()],
        };
        let ring = config.build_with(Xxh3Partitioner).unwrap();
        assert_eq!(ring.token_count(), 32);
        assert_eq!(ring.partitioner_name(), "Xxh3Partitioner");

        let ring = config.build_with(Crc32Partitioner).unwrap();
        assert_eq!(ring.node_count(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RingConfig {
            nodes: vec!["a".into()],
            ..RingConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"crc32\""));
        assert_eq!(RingConfig::from_json(&json).unwrap(), config);
    }
}
