use thiserror::Error;

/// Errors caused by missing or invalid static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown skill or feature id: '{0}'")]
    UnknownSkill(String),

    #[error("unknown model id: '{0}'")]
    UnknownModel(String),

    #[error("no credential configured for provider '{0}'")]
    MissingCredential(String),

    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Malformed caller input. Fails fast, never enters the fallback machinery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' must not be empty")]
    EmptyField(String),

    #[error("field '{field}' exceeds maximum length of {max}")]
    TooLong { field: String, max: usize },

    #[error("field '{field}' out of range: {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("unsupported value '{value}' for field '{field}'")]
    Unsupported { field: String, value: String },
}

/// Errors from knowledge ingestion and lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("document has no indexable content")]
    EmptyDocument,

    #[error("document not found: {0}")]
    DocumentNotFound(String),
}

/// Failures of the explicit knowledge operations (upload, search, delete).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Hard failures surfaced by `generate`.
///
/// Every other failure mode is absorbed into a degraded `GenerationResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request cancelled")]
    Cancelled,
}
