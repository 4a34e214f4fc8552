//! # vitals
//!
//! A pluggable health-check endpoint for Rust network services.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! You supply at most one async check routine; vitals turns its verdict into
//! one well-formed JSON response per request, every time:
//!
//! - **Pass** → `200`, custom diagnostic data plus `Status`, `Uptime` and
//!   `PrivateMemoryUsed` — standard fields are added only where your data
//!   did not already set them, so a check can override any of them.
//! - **Fail** → `500`, `{"Status":"Failure"}` plus a `Message` when the check
//!   supplied an error.
//! - **Panic** → caught at the invocation boundary and treated exactly like a
//!   fail, with the panic message surfaced when it was a string.
//!
//! What vitals intentionally does *not* do: dependency graphs, scheduled
//! background probing, multi-check aggregation. One check per invocation —
//! compose inside your routine if you need more.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vitals::{Outcome, Responder, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let responder = Responder::new().with_check(|| async {
//!         if database_reachable().await {
//!             Outcome::pass()
//!         } else {
//!             Outcome::fail_with("database unreachable")
//!         }
//!     });
//!
//!     Server::bind("0.0.0.0:3000").serve(responder).await.unwrap();
//! }
//!
//! async fn database_reachable() -> bool { true }
//! ```
//!
//! ## Embedding in an existing server
//!
//! [`Responder::respond`] returns a plain `http::Response`, so the endpoint
//! mounts behind any hyper-compatible router — [`Server`] is only a
//! convenience for sidecar-style deployments where the health endpoint is the
//! whole process.

mod check;
mod error;
mod outcome;
mod responder;
mod server;
mod snapshot;

pub mod report;

pub use check::Check;
pub use error::Error;
pub use outcome::{CheckError, CustomData, Outcome};
pub use responder::Responder;
pub use server::{DEFAULT_ROUTE, Server};
pub use snapshot::{ProcessSnapshot, SnapshotSource, SystemProbe};
