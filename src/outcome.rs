//! The result a check routine hands back.
//!
//! A check routine reports exactly one of two things: the service is healthy
//! (optionally with diagnostic data to include in the response body), or it is
//! not (optionally with an error explaining why). [`Outcome`] is that choice as
//! a sum type — a routine cannot report neither, and cannot report both.

use serde_json::{Map, Value};

/// Diagnostic key/value data a check contributes to a success response.
///
/// Keys serialize in insertion order, so caller-supplied entries appear before
/// the standard fields the composer appends.
pub type CustomData = Map<String, Value>;

/// The error value carried by a failure outcome.
///
/// Anything `Into`-convertible works, including `&str` and `String`:
///
/// ```rust
/// use vitals::Outcome;
///
/// Outcome::fail_with("connection pool exhausted");
/// ```
pub type CheckError = Box<dyn std::error::Error + Send + Sync>;

/// What a check routine concluded about service health.
#[derive(Debug)]
pub enum Outcome {
    /// The service is healthy. Any custom data is merged into the response.
    Pass(Option<CustomData>),
    /// The service is unhealthy. Any error becomes the response's `Message`.
    Fail(Option<CheckError>),
}

impl Outcome {
    /// Healthy, nothing extra to report.
    pub fn pass() -> Self {
        Self::Pass(None)
    }

    /// Healthy, with diagnostic data for the response body.
    pub fn pass_with(data: CustomData) -> Self {
        Self::Pass(Some(data))
    }

    /// Unhealthy, no further detail.
    pub fn fail() -> Self {
        Self::Fail(None)
    }

    /// Unhealthy, with an error whose `Display` form becomes the `Message`
    /// field of the response.
    pub fn fail_with(error: impl Into<CheckError>) -> Self {
        Self::Fail(Some(error.into()))
    }
}
