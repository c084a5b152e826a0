// Schedule document types.
// Deserializes the cached weekly schedule JSON written by the application shell.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WidgetError};

/// One cached weekly snapshot for a (user, term, week) triple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// Week label as shown to the user, e.g. "7".
    #[serde(rename = "weekNum", default, deserialize_with = "lenient_string")]
    pub week_number: Option<String>,
    #[serde(rename = "yearTerm", default, deserialize_with = "lenient_string")]
    pub year_term: Option<String>,
    #[serde(rename = "weekList", default, deserialize_with = "lenient_strings")]
    pub week_list: Vec<String>,
    /// Calendar-day descriptors in week order.
    #[serde(rename = "weekDayList", default, deserialize_with = "lenient_objects")]
    pub week_days: Vec<WeekDayEntry>,
    /// Class sessions for the week, unordered.
    #[serde(rename = "eventList", default, deserialize_with = "lenient_objects")]
    pub events: Vec<Event>,
}

/// One calendar day of the cached week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekDayEntry {
    /// Monday-based weekday, "1".."7".
    #[serde(rename = "weekDay", default, deserialize_with = "lenient_string")]
    pub week_day: Option<String>,
    /// Date rendered as "M.d".
    #[serde(rename = "weekDate", default, deserialize_with = "lenient_string")]
    pub week_date: Option<String>,
    /// Server-asserted "today" flag. Only trusted when `week_date` matches the device date.
    #[serde(rename = "today", default, deserialize_with = "lenient_bool")]
    pub is_today: bool,
}

/// One class session occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "weekNum", default, deserialize_with = "lenient_string")]
    pub week_number: Option<String>,
    #[serde(rename = "weekDay", default, deserialize_with = "lenient_string")]
    pub week_day: Option<String>,
    /// First period, 1-based.
    #[serde(rename = "sessionStart", default, deserialize_with = "lenient_int")]
    pub session_start: Option<i64>,
    /// Number of consecutive periods (not an end period).
    #[serde(rename = "sessionLast", default, deserialize_with = "lenient_int")]
    pub session_last: Option<i64>,
    #[serde(rename = "sessionList", default, deserialize_with = "lenient_strings")]
    pub session_list: Vec<String>,
    #[serde(rename = "eventName", default, deserialize_with = "lenient_string")]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(rename = "memberName", default, deserialize_with = "lenient_string")]
    pub member_name: Option<String>,
    #[serde(
        rename = "eventID",
        alias = "eventId",
        default,
        deserialize_with = "lenient_string"
    )]
    pub event_id: Option<String>,
}

impl ScheduleDocument {
    /// Parse a cached document. Fails on malformed JSON or a non-object root.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(WidgetError::InvalidDocument(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Non-blank week label, if any.
    pub fn week_label(&self) -> Option<&str> {
        non_blank(self.week_number.as_deref())
    }

    /// Whether any weekday entry carries the given "M.d" date.
    pub fn contains_date(&self, date_text: &str) -> bool {
        self.week_days.iter().any(|d| {
            non_blank(d.week_date.as_deref()).is_some_and(|date| date == date_text)
        })
    }

    /// The entry flagged as today whose date agrees with `date_text`.
    pub fn today_entry(&self, date_text: &str) -> Option<&WeekDayEntry> {
        self.week_days
            .iter()
            .filter(|d| d.is_today)
            .find(|d| non_blank(d.week_date.as_deref()) == Some(date_text))
    }
}

/// `Some(s)` unless `s` is missing or whitespace only.
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings, numbers and booleans read as text; anything else as absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string).filter(|s| !s.is_empty()))
}

/// Integers from numbers (truncated) or numeric strings.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Array of scalars as text, dropping empty and non-scalar entries.
fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

/// Array of objects, skipping entries that are not objects.
fn lenient_objects<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let raw = r#"{
            "weekNum": "5",
            "yearTerm": "2024-1",
            "weekList": ["1", "2", ""],
            "weekDayList": [
                {"weekDay": "3", "weekDate": "3.6", "today": true},
                {"weekDay": "4", "weekDate": "3.7"}
            ],
            "eventList": [
                {"weekDay": "3", "eventName": "数据结构", "sessionStart": 1,
                 "sessionLast": 2, "address": "A101", "memberName": "王老师",
                 "eventID": "e-1"}
            ]
        }"#;

        let doc = ScheduleDocument::parse(raw).unwrap();

        assert_eq!(doc.week_label(), Some("5"));
        assert_eq!(doc.year_term.as_deref(), Some("2024-1"));
        assert_eq!(doc.week_list, vec!["1", "2"]);
        assert_eq!(doc.week_days.len(), 2);
        assert!(doc.week_days[0].is_today);
        assert!(!doc.week_days[1].is_today);

        let event = &doc.events[0];
        assert_eq!(event.event_name.as_deref(), Some("数据结构"));
        assert_eq!(event.session_start, Some(1));
        assert_eq!(event.session_last, Some(2));
        assert_eq!(event.event_id.as_deref(), Some("e-1"));
    }

    #[test]
    fn test_parse_is_lenient_about_scalar_types() {
        let raw = r#"{
            "weekNum": 7,
            "weekDayList": [{"weekDay": 2, "weekDate": "9.1", "today": "true"}],
            "eventList": [
                {"weekDay": 2, "sessionStart": "3", "sessionLast": 2.0,
                 "sessionList": [3, "4", null, ""], "eventId": "alt"},
                "not an object",
                42
            ]
        }"#;

        let doc = ScheduleDocument::parse(raw).unwrap();

        assert_eq!(doc.week_label(), Some("7"));
        assert_eq!(doc.week_days[0].week_day.as_deref(), Some("2"));
        assert!(doc.week_days[0].is_today);
        assert_eq!(doc.events.len(), 1);
        let event = &doc.events[0];
        assert_eq!(event.week_day.as_deref(), Some("2"));
        assert_eq!(event.session_start, Some(3));
        assert_eq!(event.session_last, Some(2));
        assert_eq!(event.session_list, vec!["3", "4"]);
        assert_eq!(event.event_id.as_deref(), Some("alt"));
    }

    #[test]
    fn test_parse_failures() {
        assert!(ScheduleDocument::parse("").is_err());
        assert!(ScheduleDocument::parse("{not json").is_err());
        assert!(matches!(
            ScheduleDocument::parse("[1, 2]"),
            Err(WidgetError::InvalidDocument(_))
        ));
        assert!(matches!(
            ScheduleDocument::parse("\"text\""),
            Err(WidgetError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let doc = ScheduleDocument::parse("{}").unwrap();
        assert_eq!(doc, ScheduleDocument::default());
        assert_eq!(doc.week_label(), None);
    }

    #[test]
    fn test_today_entry_requires_matching_date() {
        let doc = ScheduleDocument::parse(
            r#"{"weekDayList": [
                {"weekDay": "1", "weekDate": "3.4", "today": true},
                {"weekDay": "2", "weekDate": "3.5", "today": false},
                {"weekDay": "3", "weekDate": "3.6", "today": true}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            doc.today_entry("3.6").and_then(|d| d.week_day.as_deref()),
            Some("3")
        );
        assert!(doc.today_entry("3.5").is_none());
        assert!(doc.contains_date("3.5"));
        assert!(!doc.contains_date("12.31"));
    }
}
