//! Error types for the ephemeral store.

use thiserror::Error;

/// Boxed error reported by an [`IdGenerator`](crate::IdGenerator)
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why the store could not assign an identifier.
#[derive(Error, Debug)]
pub enum IdGenerationError {
    /// The generator itself failed; its error is kept as the source
    #[error("identifier generator failed")]
    Generator(#[source] GeneratorError),

    /// Every candidate in the retry budget was already taken
    #[error("could not find unique id after {attempts} attempts")]
    Exhausted {
        /// Number of candidates that collided
        attempts: usize,
    },
}

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The payload could not be serialized; nothing was stored
    #[error("serialization error")]
    Serialization(#[source] serde_json::Error),

    /// No identifier could be assigned to the payload
    #[error(transparent)]
    IdGeneration(#[from] IdGenerationError),

    /// The identifier is unknown or its item has expired
    #[error("id {id} not found")]
    NotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// The stored bytes could not be decoded into the requested type
    #[error(transparent)]
    Deserialization(serde_json::Error),
}

impl StoreError {
    /// Returns `true` if the identifier was absent or expired.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub(crate) fn not_found(id: &str) -> Self {
        StoreError::NotFound { id: id.to_string() }
    }
}
