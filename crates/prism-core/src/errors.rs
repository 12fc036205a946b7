//! Error types for the Prism core library.

/// Top-level error enum for the Prism core library.
#[derive(Debug, thiserror::Error)]
pub enum PrismError {
    /// A referenced class could not be materialized from the active
    /// origin. Always propagated out of closure computation; a broken
    /// dependency graph must not silently produce an incomplete result.
    #[error("Resolution error: class `{0}` is not available from its origin")]
    Resolution(String),

    /// A type occurrence matched none of the known signature variants.
    /// The variant set is closed; a gap here means it must be extended.
    #[error("Unsupported type occurrence: {0}")]
    UnsupportedType(String),

    /// A scan-origin type descriptor failed to parse.
    #[error("Descriptor error: {0}")]
    Descriptor(String),

    /// Scan metadata handed to the universe was malformed.
    #[error("Scan input error: {0}")]
    ScanInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A traversal guard was exceeded.
    #[error("Graph limit exceeded: {0}")]
    GraphLimit(String),
}

pub type PrismResult<T> = Result<T, PrismError>;
