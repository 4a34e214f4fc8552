//! Response body composition.
//!
//! Builds the JSON record for each terminal state of a health check. The
//! functions here produce plain [`CustomData`] maps; serialization and HTTP
//! headers belong to the responder.
//!
//! # The add-if-missing merge
//!
//! [`success_body`] starts from the check's custom data and inserts the
//! standard fields **only for keys the check did not already set**. A check
//! can therefore override `Uptime` (say, with its own notion of uptime) while
//! every response is still guaranteed to carry the key. Caller keys keep
//! their insertion order and serialize before the appended standard fields.

use serde_json::Value;

use crate::outcome::CustomData;
use crate::snapshot::ProcessSnapshot;

/// `Status` label on the success path.
pub const SUCCESS_STATUS: &str = "Success";

/// `Status` label on the failure path.
pub const FAILURE_STATUS: &str = "Failure";

/// Content type of every response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds the success record: custom data plus, where absent, `Status`,
/// `Uptime` (whole milliseconds) and `PrivateMemoryUsed` (bytes).
pub fn success_body(mut custom: CustomData, snapshot: &ProcessSnapshot) -> CustomData {
    add_if_missing(&mut custom, "Status", Value::from(SUCCESS_STATUS));
    add_if_missing(&mut custom, "Uptime", Value::from(snapshot.uptime.as_millis() as u64));
    add_if_missing(&mut custom, "PrivateMemoryUsed", Value::from(snapshot.private_memory_used));
    custom
}

/// Builds the failure record. `Message` is present only when an error was
/// supplied — never serialized as null.
pub fn failure_body(message: Option<&str>) -> CustomData {
    let mut body = CustomData::new();
    body.insert("Status".to_owned(), Value::from(FAILURE_STATUS));
    if let Some(message) = message {
        body.insert("Message".to_owned(), Value::from(message));
    }
    body
}

fn add_if_missing(map: &mut CustomData, key: &str, value: Value) {
    map.entry(key).or_insert(value);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn snapshot() -> ProcessSnapshot {
        ProcessSnapshot { uptime: Duration::from_millis(100), private_memory_used: 200 }
    }

    #[test]
    fn success_adds_standard_fields_to_empty_data() {
        let body = success_body(CustomData::new(), &snapshot());

        assert_eq!(body["Status"], json!("Success"));
        assert_eq!(body["Uptime"], json!(100));
        assert_eq!(body["PrivateMemoryUsed"], json!(200));
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn success_keeps_every_caller_key_unchanged() {
        let mut custom = CustomData::new();
        custom.insert("Database".to_owned(), json!({"Region": "us-west", "Status": "ACTIVE"}));
        custom.insert("Cache".to_owned(), json!("warm"));

        let body = success_body(custom, &snapshot());

        assert_eq!(body["Database"], json!({"Region": "us-west", "Status": "ACTIVE"}));
        assert_eq!(body["Cache"], json!("warm"));
        assert_eq!(body["Status"], json!("Success"));
        assert_eq!(body["Uptime"], json!(100));
        assert_eq!(body["PrivateMemoryUsed"], json!(200));
    }

    #[test]
    fn success_never_overwrites_caller_supplied_standard_fields() {
        let mut custom = CustomData::new();
        custom.insert("Custom".to_owned(), json!("yes"));
        custom.insert("Status".to_owned(), json!("yes"));
        custom.insert("Uptime".to_owned(), json!(1000));
        custom.insert("PrivateMemoryUsed".to_owned(), json!(1001));

        let body = success_body(custom, &snapshot());

        assert_eq!(body["Custom"], json!("yes"));
        assert_eq!(body["Status"], json!("yes"));
        assert_eq!(body["Uptime"], json!(1000));
        assert_eq!(body["PrivateMemoryUsed"], json!(1001));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn success_serializes_caller_keys_before_standard_fields() {
        let mut custom = CustomData::new();
        custom.insert("Database".to_owned(), json!({"Region": "us-west", "Status": "ACTIVE"}));

        let body = success_body(custom, &snapshot());
        let text = serde_json::to_string(&body).unwrap();

        assert_eq!(
            text,
            r#"{"Database":{"Region":"us-west","Status":"ACTIVE"},"Status":"Success","Uptime":100,"PrivateMemoryUsed":200}"#
        );
    }

    #[test]
    fn failure_without_error_has_no_message_key() {
        let body = failure_body(None);
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"Status":"Failure"}"#);
    }

    #[test]
    fn failure_with_error_carries_the_message() {
        let body = failure_body(Some("BOOM"));
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"Status":"Failure","Message":"BOOM"}"#
        );
    }
}
