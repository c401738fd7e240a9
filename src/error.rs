use thiserror::Error;

/// Boxed error raised by a [`WorkUnit`](crate::WorkUnit) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced when verifying a signature or ingesting work units.
#[derive(Debug, Error)]
pub enum Error {
    /// The signature is structurally invalid.
    #[error("malformed signature: {reason}")]
    Malformed { reason: &'static str },

    /// The signature is well-formed but was produced by another scheme
    /// version, so the digests are not comparable.
    #[error("incompatible version: expected {expected:?}, found {found:?}")]
    IncompatibleVersion {
        expected: &'static str,
        found: String,
    },

    /// The signature is comparable but its digest differs from ours.
    #[error("signature mismatch got={actual:?} expected={expected:?}")]
    Mismatch {
        /// Hex digest carried by the checked signature.
        expected: String,
        /// Hex digest of the accumulator doing the check.
        actual: String,
    },

    /// A work unit failed to report its namespace or name.
    #[error("cannot resolve work unit identity: {0}")]
    WorkUnit(#[source] BoxError),
}
