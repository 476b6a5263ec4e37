use crate::DbError;
use core_types::{
    Attendance, College, Event, EventFilter, Feedback, NewAttendance, NewCollege, NewEvent,
    NewFeedback, NewRegistration, NewStudent, Registration, Student,
};
use sqlx::postgres::PgPool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Every write runs in its own transaction: one insert, then commit. If the
/// insert fails the transaction is dropped, which rolls it back and returns
/// the connection to the pool.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pub(crate) pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ==========================================================================
    // Colleges
    // ==========================================================================

    pub async fn create_college(&self, college: &NewCollege) -> Result<College, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, College>(
            "INSERT INTO colleges (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&college.name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_colleges(&self) -> Result<Vec<College>, DbError> {
        let colleges = sqlx::query_as::<_, College>("SELECT id, name FROM colleges ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(colleges)
    }

    // ==========================================================================
    // Students
    // ==========================================================================

    pub async fn create_student(&self, student: &NewStudent) -> Result<Student, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, email, college_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, college_id
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.college_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Lists students, optionally restricted to one college.
    pub async fn list_students(&self, college_id: Option<i64>) -> Result<Vec<Student>, DbError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, college_id
            FROM students
            WHERE ($1::BIGINT IS NULL OR college_id = $1)
            ORDER BY id
            "#,
        )
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    // ==========================================================================
    // Events
    // ==========================================================================

    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, event_type, start_time, end_time, college_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, event_type, start_time, end_time, college_id
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.event_type)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.college_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Lists events newest first. The type filter is a case-insensitive exact match.
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, DbError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, event_type, start_time, end_time, college_id
            FROM events
            WHERE ($1::BIGINT IS NULL OR college_id = $1)
              AND ($2::TEXT IS NULL OR LOWER(event_type) = LOWER($2))
            ORDER BY start_time DESC, id
            "#,
        )
        .bind(filter.college_id)
        .bind(filter.event_type.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    // ==========================================================================
    // Registration, attendance and feedback
    // ==========================================================================

    /// Records that a student intends to attend an event.
    /// Fails with `UniqueViolation` on a repeat and `ForeignKeyViolation` for unknown ids.
    pub async fn create_registration(
        &self,
        registration: &NewRegistration,
    ) -> Result<Registration, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (student_id, event_id)
            VALUES ($1, $2)
            RETURNING id, student_id, event_id, created_at
            "#,
        )
        .bind(registration.student_id)
        .bind(registration.event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Records a check-in. Registration is not required first.
    pub async fn create_attendance(&self, attendance: &NewAttendance) -> Result<Attendance, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (student_id, event_id)
            VALUES ($1, $2)
            RETURNING id, student_id, event_id, check_in_time
            "#,
        )
        .bind(attendance.student_id)
        .bind(attendance.event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn create_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, DbError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (student_id, event_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, student_id, event_id, rating, comment, created_at
            "#,
        )
        .bind(feedback.student_id)
        .bind(feedback.event_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }
}
