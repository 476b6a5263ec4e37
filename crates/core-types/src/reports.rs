use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the event popularity report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventPopularity {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub registrations: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentParticipation {
    pub student_id: i64,
    pub registered_events: i64,
    pub attended_events: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TopActiveStudent {
    pub student_id: i64,
    pub name: String,
    pub attended: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    pub event_id: i64,
    pub registrations: i64,
    pub attendance: i64,
    pub attendance_percent: f64,
    /// `None` when nobody has left feedback yet; never reported as zero.
    pub avg_feedback: Option<f64>,
}

impl EventStats {
    pub fn new(event_id: i64, registrations: i64, attendance: i64, avg_feedback: Option<f64>) -> Self {
        Self {
            event_id,
            registrations,
            attendance,
            attendance_percent: attendance_percent(registrations, attendance),
            avg_feedback,
        }
    }
}

/// Percentage of registrants who checked in, rounded to two decimals.
///
/// Zero registrations yields `0.0`. Attendance is not required to be a subset
/// of registrations, so the result may exceed 100.
pub fn attendance_percent(registrations: i64, attendance: i64) -> f64 {
    if registrations == 0 {
        return 0.0;
    }
    let percent = attendance as f64 / registrations as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_registrations_is_zero_percent() {
        assert_eq!(attendance_percent(0, 0), 0.0);
        assert_eq!(attendance_percent(0, 3), 0.0);
    }

    #[test]
    fn percent_is_rounded_to_two_places() {
        assert_eq!(attendance_percent(1, 1), 100.0);
        assert_eq!(attendance_percent(3, 1), 33.33);
        assert_eq!(attendance_percent(3, 2), 66.67);
    }

    #[test]
    fn attendance_without_registration_can_exceed_full() {
        assert_eq!(attendance_percent(2, 3), 150.0);
    }

    #[test]
    fn stats_keep_missing_feedback_absent() {
        let stats = EventStats::new(7, 0, 0, None);
        assert_eq!(stats.attendance_percent, 0.0);
        assert!(stats.avg_feedback.is_none());
    }
}
