use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::services::test_service::TestStats;
use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (db_status, test_count) = match state.test_service.count_tests().await {
        Ok(count) => ("ok".to_string(), count),
        Err(e) => (format!("error: {}", e), -1),
    };

    let body = json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "database": {
            "status": db_status,
            "test_count": test_count,
        },
    });
    (StatusCode::OK, Json(body))
}

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> crate::error::Result<Json<TestStats>> {
    let stats = state.test_service.stats().await?;
    Ok(Json(stats))
}
