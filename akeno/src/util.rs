use chrono::{DateTime, Utc};
use serde_json::Value;

/// v2 ids are decimal strings; older payloads may carry raw numbers.
pub(crate) fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// v2 timestamps are RFC 3339.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc))
}
