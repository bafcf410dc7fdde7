//! Helpers for the backend's JSON conventions

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Parses RFC 3339 timestamps as well as the naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// form the backend emits for columns without a time zone (read as UTC).
/// A bare date is read as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `deserialize_with` adapter for optional timestamps. `null`, a missing
/// key and `""` all mean "no value"; anything unparsable is an error.
pub fn timestamp_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw))),
    }
}

/// `deserialize_with` adapter turning `null` into the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `deserialize_with` adapter for ids the backend sends either as a JSON
/// string or as a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid id {}", other))),
    }
}

/// Optional variant of [`string_or_number`].
pub fn string_or_number_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.is_empty() => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!("invalid id {}", other))),
    }
}

/// Decodes a list row by row. Rows that do not decode are logged and
/// skipped; the rest of the list is kept.
pub fn valid_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    let total = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping {} row {} (id {}): {}", what, i, id, e);
                    None
                }
            }
        })
        .collect();
    if kept.len() < total {
        warn!("Kept {} of {} {} rows", kept.len(), total, what);
    }
    kept
}

/// `deserialize_with` adapter for embedded lists: `null` is empty and
/// undecodable rows are skipped like in [`valid_rows`].
pub fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let rows = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(valid_rows(rows, "embedded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-15T10:30:00-03:00").unwrap();
        assert_eq!(ts.hour(), 13);
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse_timestamp("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!((ts.day(), ts.hour(), ts.minute()), (15, 10, 30));
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
    }

    #[test]
    fn parses_bare_date() {
        let ts = parse_timestamp("2024-01-15").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (1, 15, 0));
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "string_or_number_opt")]
        owner: Option<String>,
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let row: Row = serde_json::from_str(r#"{"id": 12, "owner": ""}"#).unwrap();
        assert_eq!(row.id, "12");
        assert_eq!(row.owner, None);
        let row: Row = serde_json::from_str(r#"{"id": "a1"}"#).unwrap();
        assert_eq!(row.id, "a1");
        assert!(serde_json::from_str::<Row>(r#"{"id": true}"#).is_err());
    }

    #[test]
    fn bad_rows_are_skipped() {
        let rows = vec![
            serde_json::json!({"id": 1}),
            serde_json::json!({"id": [1]}),
            serde_json::json!({"id": "a3"}),
        ];
        let kept: Vec<Row> = valid_rows(rows, "test");
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "a3"]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
