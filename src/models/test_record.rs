use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Payment lifecycle of a test record. Transitions only from `Pending` to one
/// of the settled states; settled records never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestRecord {
    /// Internal row id, never exposed outside the service.
    #[serde(skip_serializing)]
    pub id: i64,
    /// External handle for the record.
    pub uuid: String,
    pub answers: JsonValue,
    pub score: i64,
    pub level: String,
    pub correct_count: i64,
    pub percentage: f64,
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub qr_code_data: Option<String>,
    pub customer_email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
