//! Resolution errors.
//!
//! Every failure is a deterministic input-validation error. None is retried
//! and none is downgraded to a default.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A bind string does not match `src[:dest[:opts]]`.
    #[error("malformed bind spec {spec:?}: {reason}")]
    MalformedBindSpec { spec: String, reason: &'static str },

    /// A home string does not match `src[:dest]`.
    #[error("malformed home spec {spec:?}: {reason}")]
    MalformedHomeSpec { spec: String, reason: &'static str },

    /// Capabilities requested both added and dropped.
    #[error("capabilities both added and dropped: {}", .names.join(", "))]
    CapabilityConflict { names: Vec<String> },

    /// Two privilege flags that contradict each other.
    #[error("--{first} cannot be combined with --{second}")]
    PrivilegeConflict {
        first: &'static str,
        second: &'static str,
    },

    /// Mutually exclusive namespace requests.
    #[error("namespace {first} conflicts with namespace {second}")]
    NamespaceConflict {
        first: &'static str,
        second: &'static str,
    },
}
