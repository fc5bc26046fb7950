//! Error types for dependency graph operations.

use thiserror::Error;

/// Result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or ordering a dependency graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A dependency cycle was detected in the graph.
    #[error("Cycle detected in dependency graph: {}", members.join(" -> "))]
    CycleDetected {
        /// Names of the nodes taking part in the cycle, in insertion order.
        members: Vec<String>,
    },

    /// One or more nodes depend on nodes that were never added.
    #[error("Missing dependencies: {}", format_missing(missing))]
    MissingDependencies {
        /// List of (node, missing_dependency) pairs.
        missing: Vec<(String, String)>,
    },
}

fn format_missing(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(node, dep)| format!("'{node}' depends on missing '{dep}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let error = Error::CycleDetected {
            members: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(error.to_string(), "Cycle detected in dependency graph: a -> b");
    }

    #[test]
    fn test_missing_display() {
        let error = Error::MissingDependencies {
            missing: vec![("writer".to_string(), "bootstrap".to_string())],
        };
        assert_eq!(
            error.to_string(),
            "Missing dependencies: 'writer' depends on missing 'bootstrap'"
        );
    }
}
