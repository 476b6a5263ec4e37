//! Read-only aggregates. Every call recomputes from the current rows; nothing is cached.

use crate::{DbError, DbRepository};
use core_types::{EventFilter, EventPopularity, EventStats, StudentParticipation, TopActiveStudent};

impl DbRepository {
    /// Registration counts per event, most popular first.
    ///
    /// The left join keeps events nobody has registered for, reported with a count of 0.
    pub async fn event_popularity(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<EventPopularity>, DbError> {
        let rows = sqlx::query_as::<_, EventPopularity>(
            r#"
            SELECT e.id, e.title, e.event_type, COUNT(r.id) AS registrations
            FROM events AS e
            LEFT JOIN registrations AS r ON r.event_id = e.id
            WHERE ($1::BIGINT IS NULL OR e.college_id = $1)
              AND ($2::TEXT IS NULL OR LOWER(e.event_type) = LOWER($2))
            GROUP BY e.id, e.title, e.event_type
            ORDER BY registrations DESC, e.id
            "#,
        )
        .bind(filter.college_id)
        .bind(filter.event_type.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Registration and attendance totals for one student.
    ///
    /// The two counts are independent; attendance is not cross-checked against registration.
    /// An unknown student simply reports zeros.
    pub async fn student_participation(
        &self,
        student_id: i64,
    ) -> Result<StudentParticipation, DbError> {
        let registered_events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        let attended_events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(StudentParticipation {
            student_id,
            registered_events,
            attended_events,
        })
    }

    /// The `limit` students with the most check-ins. Students who never attended are excluded.
    pub async fn top_active_students(&self, limit: i64) -> Result<Vec<TopActiveStudent>, DbError> {
        let rows = sqlx::query_as::<_, TopActiveStudent>(
            r#"
            SELECT s.id AS student_id, s.name, COUNT(a.id) AS attended
            FROM students AS s
            JOIN attendance AS a ON a.student_id = s.id
            GROUP BY s.id, s.name
            ORDER BY attended DESC, s.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Registrations, check-ins, attendance rate and mean rating for one event.
    pub async fn event_stats(&self, event_id: i64) -> Result<EventStats, DbError> {
        let (registrations, attendance, avg_feedback): (i64, i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM registrations WHERE event_id = $1),
                (SELECT COUNT(*) FROM attendance WHERE event_id = $1),
                (SELECT AVG(rating)::FLOAT8 FROM feedback WHERE event_id = $1)
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(EventStats::new(event_id, registrations, attendance, avg_feedback))
    }
}
