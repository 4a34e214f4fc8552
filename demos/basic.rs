//! Minimal vitals example — a health endpoint with a custom database check.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/health
//!
//! The response merges the check's custom data with the standard fields:
//!   {"Database":{"Region":"us-west","Status":"ACTIVE"},"Status":"Success","Uptime":…,"PrivateMemoryUsed":…}

use serde::Serialize;
use serde_json::Value;
use vitals::{CustomData, Outcome, Responder, Server};

#[derive(Serialize)]
struct DatabaseInfo {
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "Status")]
    status: &'static str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let responder = Responder::new().with_check(check_database);

    Server::bind("0.0.0.0:3000")
        .route("/health")
        .serve(responder)
        .await
        .expect("server error");
}

// Real app: ping your connection pool here and return Outcome::fail_with(err)
// when it errors out.
async fn check_database() -> Outcome {
    let info = DatabaseInfo { region: "us-west", status: "ACTIVE" };

    let mut data = CustomData::new();
    data.insert(
        "Database".to_owned(),
        serde_json::to_value(info).unwrap_or(Value::Null),
    );

    Outcome::pass_with(data)
}
