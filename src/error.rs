//! Error types for graph operations.

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building or searching a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A vertex was referenced that was never added to the graph.
    #[error("Vertex not found: {vertex}")]
    VertexNotFound {
        /// Debug rendering of the missing vertex.
        vertex: String,
    },

    /// The parent relation loops back on itself.
    #[error("Cycle detected while walking ancestors of {vertex}")]
    CycleDetected {
        /// Vertex the ancestor sweep started from.
        vertex: String,
    },

    /// Parameters that can never be satisfied.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },

    /// Random population gave up before reaching its target.
    #[error("Gave up after {attempts} attempts with {reached} of {target} friendship edges placed")]
    RetryLimitExceeded {
        /// Number of random pairs sampled.
        attempts: usize,
        /// Directed edges placed before giving up.
        reached: usize,
        /// Directed edges requested.
        target: usize,
    },

    /// IO error reading an input document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error for input documents.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error for input documents.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub fn vertex_not_found<V: std::fmt::Debug>(vertex: &V) -> Self {
        GraphError::VertexNotFound {
            vertex: format!("{:?}", vertex),
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        GraphError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::vertex_not_found(&42);
        assert_eq!(err.to_string(), "Vertex not found: 42");

        let err = GraphError::vertex_not_found(&"alice");
        assert!(err.to_string().contains("\"alice\""));

        let err = GraphError::RetryLimitExceeded {
            attempts: 1000,
            reached: 8,
            target: 10,
        };
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("8 of 10"));
    }
}
