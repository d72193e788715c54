//! Onboarding submission repository.

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use super::models::{NewSubmission, OnboardingSubmission};

const SELECT_COLUMNS: &str = r#"
    SELECT id, customer_id, first_name, last_name, email, phone, location,
           preferred_start_date, preferred_instructor, lesson_package, goals,
           experience_level, music_preferences, weekly_hours_available,
           equipment_access, additional_notes, created_at
    FROM onboarding_submissions
"#;

/// Repository for onboarding submissions. Rows are append-only.
#[derive(Debug, Clone)]
pub struct OnboardingRepository {
    pool: SqlitePool,
}

impl OnboardingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a submission and return its row id.
    #[instrument(skip(self, submission), fields(customer = %submission.customer_id))]
    pub async fn insert(&self, submission: &NewSubmission) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO onboarding_submissions (
                customer_id, first_name, last_name, email, phone, location,
                preferred_start_date, preferred_instructor, lesson_package, goals,
                experience_level, music_preferences, weekly_hours_available,
                equipment_access, additional_notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.customer_id)
        .bind(&submission.first_name)
        .bind(&submission.last_name)
        .bind(&submission.email)
        .bind(&submission.phone)
        .bind(&submission.location)
        .bind(&submission.preferred_start_date)
        .bind(&submission.preferred_instructor)
        .bind(&submission.lesson_package)
        .bind(&submission.goals)
        .bind(&submission.experience_level)
        .bind(&submission.music_preferences)
        .bind(&submission.weekly_hours_available)
        .bind(&submission.equipment_access)
        .bind(&submission.additional_notes)
        .bind(&submission.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert onboarding submission")?;

        let id = result.last_insert_rowid();
        debug!(id, "Stored onboarding submission");
        Ok(id)
    }

    /// Latest submission of one customer.
    #[instrument(skip(self))]
    pub async fn latest_for_customer(&self, customer_id: &str) -> Result<Option<OnboardingSubmission>> {
        let query = format!("{SELECT_COLUMNS} WHERE customer_id = ? ORDER BY id DESC LIMIT 1");
        let submission = sqlx::query_as::<_, OnboardingSubmission>(&query)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch onboarding submission")?;

        Ok(submission)
    }

    /// Latest submission of each of `customer_ids`, keyed by customer id.
    /// Customers without a submission are absent from the map.
    #[instrument(skip(self, customer_ids), fields(customers = customer_ids.len()))]
    pub async fn latest_for_customers(
        &self,
        customer_ids: &[&str],
    ) -> Result<HashMap<String, OnboardingSubmission>> {
        if customer_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        query.push(
            " WHERE id IN (SELECT MAX(id) FROM onboarding_submissions WHERE customer_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in customer_ids {
            ids.push_bind(*id);
        }
        query.push(") GROUP BY customer_id)");

        let rows = query
            .build_query_as::<OnboardingSubmission>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list onboarding submissions")?;

        Ok(rows
            .into_iter()
            .map(|row| (row.customer_id.clone(), row))
            .collect())
    }

    /// Number of stored submissions.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM onboarding_submissions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count onboarding submissions")?;
        Ok(count)
    }
}
