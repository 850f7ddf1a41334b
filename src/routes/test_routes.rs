use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use validator::Validate;

use crate::dto::test_dto::{
    CheckPaymentResponse, SubmitTestRequest, SubmitTestResponse, TestResultResponse,
};
use crate::models::test_record::PaymentStatus;
use crate::AppState;

#[axum::debug_handler]
pub async fn submit_test(
    State(state): State<AppState>,
    Json(req): Json<SubmitTestRequest>,
) -> crate::error::Result<Json<SubmitTestResponse>> {
    req.validate()?;
    let record = state.test_service.create_test(&req.answers, req.email).await?;
    tracing::info!(id = %record.uuid, score = record.score, level = %record.level, "test scored");

    Ok(Json(SubmitTestResponse {
        id: record.uuid,
        score: record.score,
        level: record.level,
        correct_count: record.correct_count,
        percentage: record.percentage,
    }))
}

/// Polling endpoint for the payment UI. Returns the current status together
/// with the result data regardless of approval.
#[axum::debug_handler]
pub async fn check_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> crate::error::Result<Json<CheckPaymentResponse>> {
    let record = state.test_service.get_test(&id).await?;

    Ok(Json(CheckPaymentResponse {
        id: record.uuid,
        payment_status: record.payment_status,
        score: record.score,
        level: record.level,
        correct_count: record.correct_count,
        percentage: record.percentage,
        answers: record.answers,
    }))
}

/// Releases the full result only once the payment is approved.
#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> crate::error::Result<Response> {
    let record = state.test_service.get_test(&id).await?;

    if record.payment_status != PaymentStatus::Approved {
        return Ok((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "payment not approved",
                "payment_status": record.payment_status,
            })),
        )
            .into_response());
    }

    Ok(Json(TestResultResponse {
        id: record.uuid,
        payment_status: record.payment_status,
        score: record.score,
        level: record.level,
        correct_count: record.correct_count,
        percentage: record.percentage,
        answers: record.answers,
    })
    .into_response())
}
