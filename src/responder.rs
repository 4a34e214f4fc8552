//! The check invoker: one request in, one well-formed JSON response out.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use tokio::task::JoinError;
use tracing::{debug, warn};

use crate::check::{BoxedCheck, Check, always_pass};
use crate::outcome::{CustomData, Outcome};
use crate::report;
use crate::snapshot::{SnapshotSource, SystemProbe};

/// Runs the configured check routine and composes the response.
///
/// Every invocation takes exactly one of three paths:
///
/// | Check behavior | Status | Body |
/// |---|---|---|
/// | returns `Outcome::Pass` | 200 | custom data + standard fields |
/// | returns `Outcome::Fail` | 500 | `Status: Failure` + optional `Message` |
/// | panics | 500 | `Status: Failure` + panic message if it was a string |
///
/// All configuration is fixed at construction time; a `Responder` is immutable
/// and shares nothing between concurrent invocations.
///
/// ```rust,no_run
/// use vitals::{Outcome, Responder};
///
/// let responder = Responder::new().with_check(|| async {
///     if disk_is_writable() {
///         Outcome::pass()
///     } else {
///         Outcome::fail_with("disk read-only")
///     }
/// });
///
/// fn disk_is_writable() -> bool { true }
/// ```
pub struct Responder {
    check: BoxedCheck,
    source: Arc<dyn SnapshotSource>,
}

impl Responder {
    /// A responder with the default always-pass check and the [`SystemProbe`]
    /// snapshot source.
    pub fn new() -> Self {
        Self { check: always_pass(), source: Arc::new(SystemProbe::new()) }
    }

    /// Replaces the check routine. Returns `self` for chaining.
    pub fn with_check(mut self, check: impl Check) -> Self {
        self.check = check.into_boxed_check();
        self
    }

    /// Replaces the snapshot source. Returns `self` for chaining.
    pub fn with_source(mut self, source: impl SnapshotSource) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Handles one health-check request.
    ///
    /// Awaits the check routine to completion before composing anything —
    /// no response is written speculatively. The returned response always has
    /// `Content-Type: application/json` and a `Content-Length` equal to the
    /// exact byte length of the body.
    pub async fn respond(&self) -> Response<Full<Bytes>> {
        let check = Arc::clone(&self.check);
        let source = Arc::clone(&self.source);

        // The snapshot fetch and the check both run inside a spawned task so
        // that a panic in either surfaces here as a JoinError instead of
        // unwinding through the transport.
        let ran = tokio::spawn(async move {
            let snapshot = source.snapshot();
            let outcome = check.run().await;
            (snapshot, outcome)
        })
        .await;

        match ran {
            Ok((snapshot, Outcome::Pass(custom))) => {
                debug!("health check passed");
                let body = report::success_body(custom.unwrap_or_default(), &snapshot);
                json_response(StatusCode::OK, &body)
            }
            Ok((_, Outcome::Fail(error))) => {
                let message = error.map(|e| e.to_string());
                warn!(message = message.as_deref(), "health check failed");
                json_response(StatusCode::INTERNAL_SERVER_ERROR, &report::failure_body(message.as_deref()))
            }
            Err(join_error) => {
                let message = panic_message(join_error);
                warn!(message = message.as_deref(), "health check panicked");
                json_response(StatusCode::INTERNAL_SERVER_ERROR, &report::failure_body(message.as_deref()))
            }
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Response assembly ─────────────────────────────────────────────────────────

fn json_response(status: StatusCode, body: &CustomData) -> Response<Full<Bytes>> {
    // Serializing a Map<String, Value> cannot fail; the fallback keeps the
    // failure body well-formed if that assumption is ever wrong.
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| br#"{"Status":"Failure"}"#.to_vec());
    let length = HeaderValue::from(bytes.len());

    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(report::JSON_CONTENT_TYPE));
    response.headers_mut().insert(CONTENT_LENGTH, length);
    response
}

/// Extracts the panic payload's string form, if it has one. `panic!("BOOM")`
/// carries a `&str`; `panic!("{x}")` carries a `String`; anything else has no
/// message.
fn panic_message(error: JoinError) -> Option<String> {
    let payload = error.try_into_panic().ok()?;
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_owned())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::snapshot::ProcessSnapshot;

    struct FixedProbe;

    impl SnapshotSource for FixedProbe {
        fn snapshot(&self) -> ProcessSnapshot {
            ProcessSnapshot { uptime: Duration::from_millis(100), private_memory_used: 200 }
        }
    }

    fn responder() -> Responder {
        Responder::new().with_source(FixedProbe)
    }

    async fn body_bytes(response: Response<Full<Bytes>>) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn default_check_passes_with_snapshot_fields() {
        let response = responder().respond().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = body_bytes(response).await;
        assert_eq!(
            body,
            br#"{"Status":"Success","Uptime":100,"PrivateMemoryUsed":200}"#
        );
    }

    #[tokio::test]
    async fn pass_with_custom_data_merges_standard_fields() {
        let responder = responder().with_check(|| async {
            let mut data = CustomData::new();
            data.insert("Database".to_owned(), json!({"Region": "us-west", "Status": "ACTIVE"}));
            Outcome::pass_with(data)
        });

        let response = responder.respond().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_bytes(response).await;
        assert_eq!(
            body,
            br#"{"Database":{"Region":"us-west","Status":"ACTIVE"},"Status":"Success","Uptime":100,"PrivateMemoryUsed":200}"#
        );
    }

    #[tokio::test]
    async fn explicit_fail_with_error_reports_its_message() {
        let responder = responder()
            .with_check(|| async { Outcome::fail_with("database unreachable") });

        let response = responder.respond().await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_bytes(response).await;
        assert_eq!(body, br#"{"Status":"Failure","Message":"database unreachable"}"#);
    }

    #[tokio::test]
    async fn explicit_fail_without_error_omits_message() {
        let responder = responder().with_check(|| async { Outcome::fail() });

        let response = responder.respond().await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_bytes(response).await;
        assert_eq!(body, br#"{"Status":"Failure"}"#);
    }

    async fn exploding() -> Outcome {
        panic!("BOOM")
    }

    #[tokio::test]
    async fn panicking_check_becomes_a_failure_response() {
        let response = responder().with_check(exploding).respond().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = body_bytes(response).await;
        assert_eq!(body, br#"{"Status":"Failure","Message":"BOOM"}"#);
    }

    #[tokio::test]
    async fn content_length_matches_body_on_both_paths() {
        for responder in [
            responder(),
            responder().with_check(|| async { Outcome::fail_with("BOOM") }),
        ] {
            let response = responder.respond().await;
            let length: usize = response.headers()[CONTENT_LENGTH].to_str().unwrap().parse().unwrap();
            let body = body_bytes(response).await;
            assert_eq!(length, body.len());
        }
    }

    #[tokio::test]
    async fn custom_data_overrides_standard_fields() {
        let responder = responder().with_check(|| async {
            let mut data = CustomData::new();
            data.insert("Uptime".to_owned(), json!("forever"));
            Outcome::pass_with(data)
        });

        let body = body_bytes(responder.respond().await).await;
        assert_eq!(body, br#"{"Uptime":"forever","Status":"Success","PrivateMemoryUsed":200}"#);
    }
}
