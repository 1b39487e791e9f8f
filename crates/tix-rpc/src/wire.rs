//! JSON-RPC 2.0 wire types and payload decoding.
//!
//! Ticket payloads arrive as `[id, created, modified, {field: value}]`,
//! changelog entries as `[timestamp, author, field, old, new, permanent]`.
//! Decoding is strict about shape and explicit about what was wrong.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tix_core::changelog::ChangeEvent;
use tix_core::error::GatewayError;
use tix_core::record::{FieldMap, TicketRecord};

/// Server fault code for an unknown ticket id.
pub const NOT_FOUND_CODE: i64 = 404;

/// One outgoing call. `id` is the batch slot index.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub id: usize,
    pub method: String,
    pub params: Value,
}

impl Request {
    #[must_use]
    pub fn new(id: usize, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// One incoming response. Exactly one of `result` / `error` is expected.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<usize>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Fault>,
}

impl Response {
    /// Collapse into the slot result, surfacing server faults verbatim.
    pub fn into_result(self) -> Result<Value, GatewayError> {
        match (self.result, self.error) {
            (_, Some(fault)) => Err(fault.into_error()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(GatewayError::Transport(
                "response carried neither result nor error".to_string(),
            )),
        }
    }
}

/// A server-reported fault: code and message pass through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    pub code: i64,
    pub message: String,
}

impl Fault {
    #[must_use]
    pub fn into_error(self) -> GatewayError {
        GatewayError::CallFailed {
            code: self.code,
            message: self.message,
        }
    }
}

/// Decode a `[id, created, modified, {fields}]` ticket payload.
pub fn decode_ticket(value: &Value) -> Result<TicketRecord, GatewayError> {
    let slots = value
        .as_array()
        .filter(|slots| slots.len() == 4)
        .ok_or_else(|| shape_error("ticket", value))?;

    let id = slots[0]
        .as_u64()
        .ok_or_else(|| shape_error("ticket id", &slots[0]))?;
    let created = decode_timestamp(&slots[1])?;
    let modified = decode_timestamp(&slots[2])?;

    let raw_fields = slots[3]
        .as_object()
        .ok_or_else(|| shape_error("ticket fields", &slots[3]))?;
    let mut fields = FieldMap::new();
    for (name, value) in raw_fields {
        let value = value
            .as_str()
            .ok_or_else(|| shape_error("ticket field value", value))?;
        fields.insert(name.clone(), value.to_string());
    }

    TicketRecord::new(id, created, modified, fields)
        .map_err(|err| GatewayError::Transport(format!("malformed ticket payload: {err}")))
}

/// Decode a changelog payload: an array of
/// `[timestamp, author, field, old, new, permanent]` entries.
pub fn decode_changelog(value: &Value) -> Result<Vec<ChangeEvent>, GatewayError> {
    let entries = value
        .as_array()
        .ok_or_else(|| shape_error("changelog", value))?;
    entries.iter().map(decode_change_event).collect()
}

fn decode_change_event(value: &Value) -> Result<ChangeEvent, GatewayError> {
    let slots = value
        .as_array()
        .filter(|slots| slots.len() == 6)
        .ok_or_else(|| shape_error("changelog entry", value))?;

    let timestamp = decode_timestamp(&slots[0])?
        .ok_or_else(|| shape_error("changelog timestamp", &slots[0]))?;
    let string = |index: usize, what: &str| -> Result<String, GatewayError> {
        slots[index]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| shape_error(what, &slots[index]))
    };

    Ok(ChangeEvent {
        timestamp,
        author: string(1, "changelog author")?,
        field: string(2, "changelog field")?,
        old_value: string(3, "changelog old value")?,
        new_value: string(4, "changelog new value")?,
        permanent: decode_flag(&slots[5])?,
    })
}

/// Timestamps arrive as RFC 3339 strings or integer epoch seconds; `null`
/// means the server did not report one.
pub fn decode_timestamp(value: &Value) -> Result<Option<DateTime<Utc>>, GatewayError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|stamp| Some(stamp.with_timezone(&Utc)))
            .map_err(|_| shape_error("timestamp", value)),
        Value::Number(_) => value
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .map(Some)
            .ok_or_else(|| shape_error("timestamp", value)),
        _ => Err(shape_error("timestamp", value)),
    }
}

fn decode_flag(value: &Value) -> Result<bool, GatewayError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(_) => value
            .as_i64()
            .map(|n| n != 0)
            .ok_or_else(|| shape_error("flag", value)),
        _ => Err(shape_error("flag", value)),
    }
}

/// Decode a plain array of strings (capabilities, legal field values).
pub fn decode_string_array(value: &Value, what: &str) -> Result<Vec<String>, GatewayError> {
    value
        .as_array()
        .ok_or_else(|| shape_error(what, value))?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error(what, entry))
        })
        .collect()
}

/// Decode the id list a query resolves to.
pub fn decode_id_array(value: &Value) -> Result<Vec<u64>, GatewayError> {
    value
        .as_array()
        .ok_or_else(|| shape_error("ticket ids", value))?
        .iter()
        .map(|entry| entry.as_u64().ok_or_else(|| shape_error("ticket id", entry)))
        .collect()
}

fn shape_error(what: &str, value: &Value) -> GatewayError {
    GatewayError::Transport(format!("unexpected {what} in response: {value}"))
}

#[cfg(test)]
mod tests {
    use super::{
        decode_changelog, decode_id_array, decode_string_array, decode_ticket, decode_timestamp,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tix_core::error::GatewayError;

    #[test]
    fn decodes_a_ticket_payload() {
        let payload = json!([
            42,
            "2026-02-01T08:30:00Z",
            "2026-02-03T17:05:00Z",
            {"summary": "Broken link", "status": "new", "priority": "normal"}
        ]);
        let record = decode_ticket(&payload).unwrap();
        assert_eq!(record.id(), Some(42));
        assert_eq!(
            record.created(),
            Some(Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap())
        );
        assert_eq!(record.field("summary"), Some("Broken link"));
        assert!(record.diff().is_empty());
    }

    #[test]
    fn ticket_payload_with_reserved_field_is_rejected() {
        let payload = json!([42, null, null, {"id": "42", "summary": "x"}]);
        let err = decode_ticket(&payload).unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[test]
    fn ticket_payload_wrong_arity_is_rejected() {
        assert!(decode_ticket(&json!([42, null, null])).is_err());
        assert!(decode_ticket(&json!({"id": 42})).is_err());
    }

    #[test]
    fn non_string_field_value_is_rejected() {
        let payload = json!([42, null, null, {"summary": 7}]);
        assert!(decode_ticket(&payload).is_err());
    }

    #[test]
    fn timestamps_accept_rfc3339_epoch_and_null() {
        assert_eq!(
            decode_timestamp(&json!("2026-02-01T08:30:00Z")).unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap())
        );
        assert_eq!(
            decode_timestamp(&json!(1_700_000_000)).unwrap(),
            Some(Utc.timestamp_opt(1_700_000_000, 0).single().unwrap())
        );
        assert_eq!(decode_timestamp(&json!(null)).unwrap(), None);
        assert!(decode_timestamp(&json!("yesterday")).is_err());
    }

    #[test]
    fn decodes_a_changelog() {
        let payload = json!([
            ["2026-02-03T17:05:00Z", "alice", "status", "new", "accepted", true],
            ["2026-02-04T09:00:00Z", "bob", "comment", "", "looks fixed", 0]
        ]);
        let events = decode_changelog(&payload).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].author, "alice");
        assert!(events[0].permanent);
        assert_eq!(events[1].new_value, "looks fixed");
        assert!(!events[1].permanent);
    }

    #[test]
    fn decodes_string_and_id_arrays() {
        assert_eq!(
            decode_string_array(&json!(["low", "high"]), "priorities").unwrap(),
            vec!["low".to_string(), "high".to_string()]
        );
        assert_eq!(decode_id_array(&json!([3, 1, 2])).unwrap(), vec![3, 1, 2]);
        assert!(decode_id_array(&json!(["x"])).is_err());
    }
}
