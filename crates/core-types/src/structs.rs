use crate::enums::Status;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Persisted entities
// ==============================================================================

/// Root organizational entity. Owns students and events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct College {
    pub id: i64,
    pub name: String,
}

/// A student belongs to exactly one college; the email is unique system-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub college_id: i64,
}

/// An event hosted by a college. `end_time` is always after `start_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Free-form category such as "Workshop", "Fest" or "Seminar".
    #[serde(rename = "type")]
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub college_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub check_in_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// Creation payloads
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollege {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub college_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Accepts RFC 3339 or a timestamp without an offset, which is taken as UTC.
    #[serde(deserialize_with = "utc_or_naive")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "utc_or_naive")]
    pub end_time: DateTime<Utc>,
    pub college_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewRegistration {
    pub student_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewAttendance {
    pub student_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub student_id: i64,
    pub event_id: i64,
    /// Out-of-range integers saturate so the range check reports them.
    #[serde(deserialize_with = "saturating_i32")]
    pub rating: i32,
    /// A missing or `null` comment is stored as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn utc_or_naive<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(with_offset) = raw.parse::<DateTime<Utc>>() {
        return Ok(with_offset);
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
}

fn saturating_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let wide = i64::deserialize(deserializer)?;
    Ok(wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

// ==============================================================================
// Queries and acknowledgements
// ==============================================================================

/// Optional filters shared by the event listing and the popularity report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub college_id: Option<i64>,
    /// Matched case-insensitively against the whole event type.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// Body returned by writes that do not echo an entity back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Skipped,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn event_type_uses_the_wire_name() {
        let payload: NewEvent = serde_json::from_value(json!({
            "title": "Workshop",
            "type": "Workshop",
            "start_time": "2025-03-01T10:00:00Z",
            "end_time": "2025-03-01T12:00:00Z",
            "college_id": 1
        }))
        .unwrap();

        assert_eq!(payload.event_type, "Workshop");
        assert_eq!(payload.description, "");
    }

    #[test]
    fn event_times_without_offset_are_utc() {
        let payload: NewEvent = serde_json::from_value(json!({
            "title": "Workshop",
            "type": "Workshop",
            "start_time": "2025-03-02T10:00:00.123456",
            "end_time": "2025-03-02T12:00:00+02:00",
            "college_id": 1
        }))
        .unwrap();

        let start = Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap() + Duration::microseconds(123_456);
        assert_eq!(payload.start_time, start);
        assert_eq!(payload.end_time, Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn garbage_event_time_is_a_decode_error() {
        let result = serde_json::from_value::<NewEvent>(json!({
            "title": "Workshop",
            "type": "Workshop",
            "start_time": "next tuesday",
            "end_time": "2025-03-02T12:00:00Z",
            "college_id": 1
        }));
        assert!(result.unwrap_err().to_string().contains("next tuesday"));
    }

    #[test]
    fn huge_rating_saturates_instead_of_failing_to_decode() {
        let payload: NewFeedback = serde_json::from_value(json!({
            "student_id": 1,
            "event_id": 2,
            "rating": 3_000_000_000i64
        }))
        .unwrap();
        assert_eq!(payload.rating, i32::MAX);
    }

    #[test]
    fn null_comment_becomes_empty() {
        let payload: NewFeedback = serde_json::from_value(json!({
            "student_id": 1,
            "event_id": 2,
            "rating": 4,
            "comment": null
        }))
        .unwrap();

        assert_eq!(payload.comment, "");
    }

    #[test]
    fn ack_omits_missing_reason() {
        assert_eq!(serde_json::to_value(Ack::ok()).unwrap(), json!({ "status": "ok" }));
        assert_eq!(
            serde_json::to_value(Ack::skipped("Already seeded")).unwrap(),
            json!({ "status": "skipped", "reason": "Already seeded" })
        );
    }
}
