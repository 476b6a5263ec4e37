use crate::{DbError, DbRepository};
use chrono::{Duration, Utc};

pub const SEED_COLLEGE: &str = "Acharya Institute of Technology";

/// What a call to [`DbRepository::seed_sample_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted,
    /// At least one college already existed, so nothing was written.
    Skipped,
}

struct SampleEvent {
    title: &'static str,
    description: &'static str,
    event_type: &'static str,
    starts_in: Duration,
    length: Duration,
}

impl DbRepository {
    /// Inserts one college with two students and two upcoming events.
    ///
    /// The existence check and all inserts share one transaction. Two concurrent
    /// first calls can both pass the check; the loser then fails on the unique
    /// college name and rolls back, so the sample data is never duplicated.
    pub async fn seed_sample_data(&self) -> Result<SeedOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colleges")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::info!(colleges = existing, "Seed skipped, data already present.");
            return Ok(SeedOutcome::Skipped);
        }

        let college_id: i64 =
            sqlx::query_scalar("INSERT INTO colleges (name) VALUES ($1) RETURNING id")
                .bind(SEED_COLLEGE)
                .fetch_one(&mut *tx)
                .await?;

        for (name, email) in [("Alice", "alice@example.com"), ("Bob", "bob@example.com")] {
            sqlx::query("INSERT INTO students (name, email, college_id) VALUES ($1, $2, $3)")
                .bind(name)
                .bind(email)
                .bind(college_id)
                .execute(&mut *tx)
                .await?;
        }

        let now = Utc::now();
        let events = [
            SampleEvent {
                title: "Intro to FastAPI",
                description: "Hands-on workshop",
                event_type: "Workshop",
                starts_in: Duration::days(1),
                length: Duration::hours(2),
            },
            SampleEvent {
                title: "Tech Talk: AI",
                description: "Seminar on AI trends",
                event_type: "Seminar",
                starts_in: Duration::days(2),
                length: Duration::hours(1),
            },
        ];
        for event in events {
            let start_time = now + event.starts_in;
            sqlx::query(
                r#"
                INSERT INTO events (title, description, event_type, start_time, end_time, college_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(event.title)
            .bind(event.description)
            .bind(event.event_type)
            .bind(start_time)
            .bind(start_time + event.length)
            .bind(college_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(college_id, "Sample data seeded.");
        Ok(SeedOutcome::Inserted)
    }
}
