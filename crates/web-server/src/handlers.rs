use crate::{
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    AppState,
};
use axum::{extract::State, Json};
use core_types::{
    Ack, College, Event, EventFilter, EventPopularity, EventStats, NewAttendance, NewCollege,
    NewEvent, NewFeedback, NewRegistration, NewStudent, Normalize, Student, StudentParticipation,
    TopActiveStudent, Validate, ValidationErrors,
};
use database::SeedOutcome;
use serde::Deserialize;
use std::sync::Arc;

// Registration, attendance and feedback deliberately report one message for
// both "already exists" and "unknown student or event".
const REGISTRATION_FAILED: &str = "Registration failed or already exists";
const ATTENDANCE_FAILED: &str = "Attendance already marked or invalid data";
const FEEDBACK_FAILED: &str = "Feedback already submitted or invalid data";

const COLLEGE_MISSING: &str = "College does not exist";
const EVENT_INVALID: &str = "College does not exist or event times are invalid";

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub college_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopActiveQuery {
    pub limit: Option<i64>,
}

// ==============================================================================
// Colleges, students, events
// ==============================================================================

/// # POST /colleges
pub async fn create_college(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewCollege>,
) -> Result<Json<College>, AppError> {
    let payload = payload.normalize();
    payload.validate()?;

    let college = state
        .db_repo
        .create_college(&payload)
        .await
        .map_err(|e| AppError::from_write(e, "A college with this name already exists", COLLEGE_MISSING))?;

    tracing::info!(college_id = college.id, name = %college.name, "College created.");
    Ok(Json(college))
}

/// # GET /colleges
pub async fn list_colleges(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<College>>, AppError> {
    let colleges = state.db_repo.list_colleges().await?;
    Ok(Json(colleges))
}

/// # POST /students
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewStudent>,
) -> Result<Json<Student>, AppError> {
    let payload = payload.normalize();
    payload.validate()?;

    let student = state
        .db_repo
        .create_student(&payload)
        .await
        .map_err(|e| AppError::from_write(e, "A student with this email already exists", COLLEGE_MISSING))?;

    tracing::info!(student_id = student.id, college_id = student.college_id, "Student created.");
    Ok(Json(student))
}

/// # GET /students?college_id=
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<StudentQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.db_repo.list_students(query.college_id).await?;
    Ok(Json(students))
}

/// # POST /events
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewEvent>,
) -> Result<Json<Event>, AppError> {
    let payload = payload.normalize();
    payload.validate()?;

    let event = state
        .db_repo
        .create_event(&payload)
        .await
        .map_err(|e| AppError::from_write(e, "Event already exists", EVENT_INVALID))?;

    tracing::info!(event_id = event.id, title = %event.title, "Event created.");
    Ok(Json(event))
}

/// # GET /events?college_id=&type=
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    AppQuery(filter): AppQuery<EventFilter>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.db_repo.list_events(&filter.normalize()).await?;
    Ok(Json(events))
}

// ==============================================================================
// Registration, attendance, feedback
// ==============================================================================

/// # POST /register
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewRegistration>,
) -> Result<Json<Ack>, AppError> {
    payload.validate()?;

    let registration = state
        .db_repo
        .create_registration(&payload)
        .await
        .map_err(|e| AppError::from_write(e, REGISTRATION_FAILED, REGISTRATION_FAILED))?;

    tracing::info!(
        student_id = registration.student_id,
        event_id = registration.event_id,
        "Student registered."
    );
    Ok(Json(Ack::ok()))
}

/// # POST /attendance
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewAttendance>,
) -> Result<Json<Ack>, AppError> {
    payload.validate()?;

    let attendance = state
        .db_repo
        .create_attendance(&payload)
        .await
        .map_err(|e| AppError::from_write(e, ATTENDANCE_FAILED, ATTENDANCE_FAILED))?;

    tracing::info!(
        student_id = attendance.student_id,
        event_id = attendance.event_id,
        "Attendance marked."
    );
    Ok(Json(Ack::ok()))
}

/// # POST /feedback
/// The rating range is checked here, before any storage access.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewFeedback>,
) -> Result<Json<Ack>, AppError> {
    let payload = payload.normalize();
    payload.validate()?;

    let feedback = state
        .db_repo
        .create_feedback(&payload)
        .await
        .map_err(|e| AppError::from_write(e, FEEDBACK_FAILED, FEEDBACK_FAILED))?;

    tracing::info!(
        student_id = feedback.student_id,
        event_id = feedback.event_id,
        rating = feedback.rating,
        "Feedback submitted."
    );
    Ok(Json(Ack::ok()))
}

// ==============================================================================
// Reports
// ==============================================================================

/// # GET /reports/event-popularity?college_id=&type=
pub async fn event_popularity(
    State(state): State<Arc<AppState>>,
    AppQuery(filter): AppQuery<EventFilter>,
) -> Result<Json<Vec<EventPopularity>>, AppError> {
    let rows = state.db_repo.event_popularity(&filter.normalize()).await?;
    Ok(Json(rows))
}

/// # GET /reports/student-participation/{id}
pub async fn student_participation(
    State(state): State<Arc<AppState>>,
    AppPath(student_id): AppPath<i64>,
) -> Result<Json<StudentParticipation>, AppError> {
    let participation = state.db_repo.student_participation(student_id).await?;
    Ok(Json(participation))
}

/// # GET /reports/top-active?limit=
pub async fn top_active(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<TopActiveQuery>,
) -> Result<Json<Vec<TopActiveStudent>>, AppError> {
    let max = state.reports.top_active_max_limit;
    let limit = query.limit.unwrap_or(state.reports.top_active_default_limit);
    if !(1..=max).contains(&limit) {
        return Err(ValidationErrors::single("limit", format!("limit must be between 1 and {max}")).into());
    }

    let rows = state.db_repo.top_active_students(limit).await?;
    Ok(Json(rows))
}

/// # GET /reports/event-stats/{id}
pub async fn event_stats(
    State(state): State<Arc<AppState>>,
    AppPath(event_id): AppPath<i64>,
) -> Result<Json<EventStats>, AppError> {
    let stats = state.db_repo.event_stats(event_id).await?;
    Ok(Json(stats))
}

// ==============================================================================
// Seed
// ==============================================================================

/// # POST /seed
/// Inserts sample data once; later calls report `skipped`.
pub async fn seed(State(state): State<Arc<AppState>>) -> Result<Json<Ack>, AppError> {
    let ack = match state.db_repo.seed_sample_data().await? {
        SeedOutcome::Inserted => Ack::ok(),
        SeedOutcome::Skipped => Ack::skipped("Already seeded"),
    };
    Ok(Json(ack))
}
