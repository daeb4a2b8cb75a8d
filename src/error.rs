//! Error types for linkdiag.

use thiserror::Error;

/// Main error type for all linkdiag operations.
///
/// Decode-side failures (framing, protocol, checksum, pattern) are never
/// surfaced as errors: the sink records them in counters and keeps
/// consuming bytes. The variants here cover catalog construction and
/// encode-side lookups, plus the internal header-parse detail the sink
/// maps onto its protocol-error counter.
#[derive(Debug, Error)]
pub enum LinkdiagError {
    /// A pattern was registered with an empty seed sequence.
    #[error("pattern {0:?} has an empty seed sequence")]
    EmptySeed(String),

    /// Two patterns were registered under the same name.
    #[error("pattern {0:?} is already registered")]
    DuplicatePattern(String),

    /// Encode-side lookup of a name the catalog does not know.
    #[error("unknown pattern: {0:?}")]
    UnknownPattern(String),

    /// Protocol error (missing or malformed header field).
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using LinkdiagError.
pub type Result<T> = std::result::Result<T, LinkdiagError>;
