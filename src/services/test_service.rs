use crate::error::{Error, Result};
use crate::models::test_record::{PaymentStatus, TestRecord};
use crate::services::scoring_service::ScoringService;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Email stored when the client does not supply one.
pub const PLACEHOLDER_EMAIL: &str = "cliente@qi-test.com.br";

const RECORD_COLUMNS: &str = "id, uuid, answers, score, level, correct_count, percentage, \
     payment_id, payment_status, qr_code_data, customer_email, created_at, expires_at";

#[derive(Debug, serde::Serialize)]
pub struct TestStats {
    pub total_tests: i64,
    pub paid_tests: i64,
    pub avg_score: f64,
    pub conversion_rate: f64,
}

#[derive(Clone)]
pub struct TestService {
    pool: SqlitePool,
}

impl TestService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scores the answer sheet and persists a new pending record. The record
    /// expires 24 hours after creation unless a payment settles it first.
    pub async fn create_test(
        &self,
        answers: &[i64],
        email: Option<String>,
    ) -> Result<TestRecord> {
        let result = ScoringService::score(answers)?;
        let uuid = Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = now + Duration::hours(24);
        let customer_email = email.unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
        let answers_json = serde_json::to_value(answers)?;

        let record = sqlx::query_as::<_, TestRecord>(&format!(
            r#"
            INSERT INTO tests (
                uuid, answers, score, level, correct_count, percentage,
                customer_email, created_at, expires_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&uuid)
        .bind(&answers_json)
        .bind(result.score)
        .bind(result.level)
        .bind(result.correct_count)
        .bind(result.percentage)
        .bind(&customer_email)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_test(&self, uuid: &str) -> Result<TestRecord> {
        let record = sqlx::query_as::<_, TestRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM tests WHERE uuid = ?1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| Error::NotFound("test not found".to_string()))
    }

    /// Attaches a charge to a record. A record supports at most one payment
    /// attempt: retrying with the same charge id is a no-op, a different
    /// charge id is a conflict.
    pub async fn attach_payment(
        &self,
        uuid: &str,
        payment_id: &str,
        qr_code_data: Option<&str>,
    ) -> Result<()> {
        let rows = sqlx::query(
            "UPDATE tests SET payment_id = ?1, qr_code_data = ?2 \
             WHERE uuid = ?3 AND payment_id IS NULL",
        )
        .bind(payment_id)
        .bind(qr_code_data)
        .bind(uuid)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows > 0 {
            return Ok(());
        }

        // Guarded update missed: either the record is unknown or a payment
        // is already attached.
        let existing = self.get_test(uuid).await?;
        match existing.payment_id.as_deref() {
            Some(attached) if attached == payment_id => Ok(()),
            Some(_) => Err(Error::Conflict(
                "a different payment is already attached to this test".to_string(),
            )),
            None => Err(Error::Internal(
                "payment attach failed unexpectedly".to_string(),
            )),
        }
    }

    /// Settles a pending record. The `payment_status = 'pending'` guard in
    /// the statement is what makes reconciliation idempotent under
    /// concurrent notifications; returns whether a row actually changed.
    pub async fn update_payment_status(
        &self,
        uuid: &str,
        status: PaymentStatus,
    ) -> Result<bool> {
        let rows = sqlx::query(
            "UPDATE tests SET payment_status = ?1 \
             WHERE uuid = ?2 AND payment_status = 'pending'",
        )
        .bind(status)
        .bind(uuid)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    /// Deletes stale records that never got paid. Settled records are kept
    /// indefinitely.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let rows = sqlx::query(
            "DELETE FROM tests WHERE expires_at < ?1 AND payment_status = 'pending'",
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    /// Append-only audit insert. Callers treat a failure here as
    /// best-effort: log and carry on.
    pub async fn log_webhook(
        &self,
        payment_id: Option<&str>,
        action: &str,
        payload: &JsonValue,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO webhook_logs (payment_id, action, payload, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(payment_id)
        .bind(action)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count_tests(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM tests")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    pub async fn stats(&self) -> Result<TestStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_tests,
                COALESCE(SUM(payment_status = 'approved'), 0) AS paid_tests,
                COALESCE(AVG(CASE WHEN payment_status = 'approved' THEN score END), 0.0) AS avg_score
            FROM tests
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let total_tests: i64 = row.try_get("total_tests")?;
        let paid_tests: i64 = row.try_get("paid_tests")?;
        let avg_score: f64 = row.try_get("avg_score")?;

        Ok(TestStats {
            total_tests,
            paid_tests,
            avg_score,
            conversion_rate: paid_tests as f64 / total_tests.max(1) as f64 * 100.0,
        })
    }
}
