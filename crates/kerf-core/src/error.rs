//! Error types for the kerf SDF/CAM kernel.
//!
//! Every variant carries a single pre-formatted message that names the
//! offending parameter and its value (and, for name lookups, the current
//! set of valid names) — this is the kernel's primary feedback channel back
//! to an LLM caller, so messages are written to stand alone.

use thiserror::Error;

/// Result type alias used throughout kerf-core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by core operations.
///
/// The five variants correspond to the kernel's error taxonomy: a
/// non-positive dimension or invalid enum is
/// [`Error::InvalidParameter`], a missing face/edge/feature name is
/// [`Error::NotFound`], a face that fails a shape precondition (planar,
/// axis-aligned) is [`Error::TopologyMismatch`], exporting before a
/// computation has run is [`Error::StateViolation`], and a grid or vector
/// that would blow a numeric budget is [`Error::NumericLimit`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("topology mismatch: {0}")]
    TopologyMismatch(String),

    #[error("state violation: {0}")]
    StateViolation(String),

    #[error("numeric limit: {0}")]
    NumericLimit(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_parameter(op: &str, param: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidParameter(format!("{op}: `{param}` = {value} is invalid"))
    }

    pub fn not_found(op: &str, kind: &str, name: &str, available: &[String]) -> Self {
        Self::NotFound(format!(
            "{op}: no {kind} named `{name}` (available: {})",
            if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            }
        ))
    }

    pub fn topology_mismatch(op: &str, reason: impl std::fmt::Display) -> Self {
        Self::TopologyMismatch(format!("{op}: {reason}"))
    }

    pub fn state_violation(op: &str, reason: impl std::fmt::Display) -> Self {
        Self::StateViolation(format!("{op}: {reason}"))
    }

    pub fn numeric_limit(op: &str, reason: impl std::fmt::Display) -> Self {
        Self::NumericLimit(format!("{op}: {reason}"))
    }
}
