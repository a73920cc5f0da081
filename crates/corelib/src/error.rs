//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Lookups and removals never fail: an empty ring answers `None` and removing
/// an unknown node is a no-op. Only construction and configuration can error.
#[derive(Debug, Error)]
pub enum Error {
    /// Ring parameters are unusable (e.g. zero virtual nodes per node).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Node identity cannot be placed on the ring.
    #[error("Invalid node: {0}")]
    InvalidNode(String),
    /// Configuration document could not be read or parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    /// Configuration file could not be opened.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfiguration("vnodes_per_node must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: vnodes_per_node must be positive"
        );
        assert_eq!(Error::InvalidNode("empty".into()).to_string(), "Invalid node: empty");
    }
}
