//! Index configuration.

use serde::{Deserialize, Serialize};

/// Retrieval index parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Number of results returned by `query_default` (must be positive).
    pub default_n_results: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            default_n_results: 3,
        }
    }
}

impl IndexConfig {
    /// Configuration used when assembling prompt context (two documents per query).
    pub fn context() -> Self {
        Self {
            default_n_results: 2,
        }
    }

    /// Configuration with a custom default result count.
    pub fn with_n_results(default_n_results: usize) -> Self {
        Self { default_n_results }
    }
}
