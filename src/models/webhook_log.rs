use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Append-only audit row for every inbound provider notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookLog {
    pub id: i64,
    pub payment_id: Option<String>,
    pub action: String,
    pub payload: JsonValue,
    pub created_at: DateTime<Utc>,
}
