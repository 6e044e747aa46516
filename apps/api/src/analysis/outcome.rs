//! Degrade-on-failure result type.
//!
//! Model and parse failures are not errors for callers of the analysis
//! engine: every operation still produces a renderable response. `Outcome`
//! keeps the distinction visible to the engine and its tests, and
//! `Fallback` lets each response type decide what its degraded form looks
//! like.

use std::fmt;

use crate::llm_client::ModelCallError;

/// Why an analysis produced a degraded result instead of a model-backed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// No usable provider key; no call was attempted.
    NotConfigured,
    /// The call was attempted and failed.
    ModelCall(String),
}

impl DegradeReason {
    /// The underlying cause without the "AI analysis failed" prefix.
    pub fn cause(&self) -> &str {
        match self {
            DegradeReason::NotConfigured => NOT_CONFIGURED_MESSAGE,
            DegradeReason::ModelCall(msg) => msg,
        }
    }
}

pub const NOT_CONFIGURED_MESSAGE: &str = "AI service not configured";

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::NotConfigured => f.write_str(NOT_CONFIGURED_MESSAGE),
            DegradeReason::ModelCall(msg) => write!(f, "AI analysis failed: {msg}"),
        }
    }
}

impl From<ModelCallError> for DegradeReason {
    fn from(err: ModelCallError) -> Self {
        match err {
            ModelCallError::NotConfigured => DegradeReason::NotConfigured,
            other => DegradeReason::ModelCall(other.to_string()),
        }
    }
}

/// Builds the degraded rendering of a response type.
pub trait Fallback {
    fn degraded(reason: &DegradeReason) -> Self;
}

#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Complete(T),
    Degraded(DegradeReason),
}

impl<T> Outcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    pub fn degrade_reason(&self) -> Option<&DegradeReason> {
        match self {
            Outcome::Complete(_) => None,
            Outcome::Degraded(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Complete(value) => Outcome::Complete(f(value)),
            Outcome::Degraded(reason) => Outcome::Degraded(reason),
        }
    }
}

impl<T: Fallback> Outcome<T> {
    /// Collapses into the response type, rendering the degraded form if needed.
    pub fn render(self) -> T {
        match self {
            Outcome::Complete(value) => value,
            Outcome::Degraded(reason) => T::degraded(&reason),
        }
    }
}

impl<T> From<Result<T, DegradeReason>> for Outcome<T> {
    fn from(result: Result<T, DegradeReason>) -> Self {
        match result {
            Ok(value) => Outcome::Complete(value),
            Err(reason) => Outcome::Degraded(reason),
        }
    }
}
