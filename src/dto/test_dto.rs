use crate::models::test_record::PaymentStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitTestRequest {
    #[validate(length(equal = 30, message = "exactly 30 answers are required"))]
    pub answers: Vec<i64>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTestResponse {
    pub id: String,
    pub score: i64,
    pub level: String,
    pub correct_count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPaymentResponse {
    pub id: String,
    pub payment_status: PaymentStatus,
    pub score: i64,
    pub level: String,
    pub correct_count: i64,
    pub percentage: f64,
    pub answers: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultResponse {
    pub id: String,
    pub payment_status: PaymentStatus,
    pub score: i64,
    pub level: String,
    pub correct_count: i64,
    pub percentage: f64,
    pub answers: JsonValue,
}
