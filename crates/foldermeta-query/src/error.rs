//! Error types for queries.

use thiserror::Error;

/// Errors that can occur while building a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The name pattern is not a valid glob.
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
