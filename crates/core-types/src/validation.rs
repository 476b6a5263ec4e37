//! Field-level checks applied to every creation payload before it reaches storage.
//!
//! Each payload implements [`Validate`], which reports *all* failing fields at
//! once as a [`ValidationErrors`] value. [`Normalize`] runs first and trims the
//! free-text fields so that `"  "` is treated the same as `""`.

use crate::error::ValidationErrors;
use crate::structs::{
    EventFilter, NewAttendance, NewCollege, NewEvent, NewFeedback, NewRegistration, NewStudent,
};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").ok());

/// Structural checks that must pass before a payload is persisted.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Canonicalises user-supplied text before validation and persistence.
pub trait Normalize {
    fn normalize(self) -> Self;
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

fn require_text(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} must not be empty"));
    }
}

fn require_id(errors: &mut ValidationErrors, field: &'static str, value: i64) {
    if value < 1 {
        errors.add(field, format!("{field} must be a positive identifier"));
    }
}

// --- Colleges ---

impl Normalize for NewCollege {
    fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

impl Validate for NewCollege {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        errors.into_result()
    }
}

// --- Students ---

impl Normalize for NewStudent {
    fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            college_id: self.college_id,
        }
    }
}

impl Validate for NewStudent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        if !is_valid_email(&self.email) {
            errors.add("email", "email must be a valid email address");
        }
        require_id(&mut errors, "college_id", self.college_id);
        errors.into_result()
    }
}

// --- Events ---

impl Normalize for NewEvent {
    fn normalize(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            event_type: self.event_type.trim().to_string(),
            ..self
        }
    }
}

impl Validate for NewEvent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "type", &self.event_type);
        if self.end_time <= self.start_time {
            errors.add("end_time", "end_time must be after start_time");
        }
        require_id(&mut errors, "college_id", self.college_id);
        errors.into_result()
    }
}

// --- Registration, attendance and feedback ---

impl Validate for NewRegistration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_id(&mut errors, "student_id", self.student_id);
        require_id(&mut errors, "event_id", self.event_id);
        errors.into_result()
    }
}

impl Validate for NewAttendance {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_id(&mut errors, "student_id", self.student_id);
        require_id(&mut errors, "event_id", self.event_id);
        errors.into_result()
    }
}

impl Normalize for NewFeedback {
    fn normalize(self) -> Self {
        Self {
            comment: self.comment.trim().to_string(),
            ..self
        }
    }
}

impl Validate for NewFeedback {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_id(&mut errors, "student_id", self.student_id);
        require_id(&mut errors, "event_id", self.event_id);
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.add(
                "rating",
                format!("rating must be between {MIN_RATING} and {MAX_RATING}"),
            );
        }
        errors.into_result()
    }
}

// --- Filters ---

impl Normalize for EventFilter {
    /// A blank type filter means "no filter".
    fn normalize(self) -> Self {
        let event_type = self
            .event_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            college_id: self.college_id,
            event_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn event(hours: i64) -> NewEvent {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        NewEvent {
            title: "Workshop".to_string(),
            description: String::new(),
            event_type: "Workshop".to_string(),
            start_time: start,
            end_time: start + Duration::hours(hours),
            college_id: 1,
        }
    }

    fn fields(result: Result<(), ValidationErrors>) -> Vec<&'static str> {
        result
            .unwrap_err()
            .errors
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn blank_college_name_is_rejected_after_trimming() {
        let college = NewCollege {
            name: "   ".to_string(),
        }
        .normalize();
        assert_eq!(college.name, "");
        assert_eq!(fields(college.validate()), vec!["name"]);
    }

    #[test]
    fn college_name_is_trimmed() {
        let college = NewCollege {
            name: "  X  ".to_string(),
        }
        .normalize();
        assert_eq!(college.name, "X");
        assert!(college.validate().is_ok());
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL_RE.is_some());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("alice@x.com."));
    }

    #[test]
    fn student_reports_every_bad_field() {
        let student = NewStudent {
            name: "".to_string(),
            email: "nope".to_string(),
            college_id: 0,
        };
        assert_eq!(fields(student.validate()), vec!["name", "email", "college_id"]);
    }

    #[test]
    fn event_end_must_follow_start() {
        assert!(event(2).validate().is_ok());
        assert_eq!(fields(event(0).validate()), vec!["end_time"]);
        assert_eq!(fields(event(-1).validate()), vec!["end_time"]);
    }

    #[test]
    fn event_requires_title_and_type() {
        let mut e = event(1);
        e.title = " ".to_string();
        e.event_type = String::new();
        assert_eq!(fields(e.normalize().validate()), vec!["title", "type"]);
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let feedback = |rating| NewFeedback {
            student_id: 1,
            event_id: 1,
            rating,
            comment: String::new(),
        };
        assert!(feedback(1).validate().is_ok());
        assert!(feedback(5).validate().is_ok());
        assert_eq!(fields(feedback(0).validate()), vec!["rating"]);
        assert_eq!(fields(feedback(6).validate()), vec!["rating"]);
    }

    #[test]
    fn link_payloads_need_positive_ids() {
        let reg = NewRegistration {
            student_id: 0,
            event_id: -3,
        };
        assert_eq!(fields(reg.validate()), vec!["student_id", "event_id"]);

        let att = NewAttendance {
            student_id: 4,
            event_id: 2,
        };
        assert!(att.validate().is_ok());
    }

    #[test]
    fn blank_type_filter_is_dropped() {
        let filter = EventFilter {
            college_id: Some(2),
            event_type: Some("  ".to_string()),
        }
        .normalize();
        assert_eq!(filter.college_id, Some(2));
        assert!(filter.event_type.is_none());
    }

    #[test]
    fn error_summary_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "name must not be empty");
        errors.add("email", "email must be a valid email address");
        assert_eq!(
            errors.to_string(),
            "name: name must not be empty; email: email must be a valid email address"
        );
    }
}
