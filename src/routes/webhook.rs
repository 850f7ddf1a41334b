use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value as JsonValue};

use crate::AppState;

/// Inbound notification endpoint for the payment provider. Always answers
/// 200: the provider retries any non-2xx response, and a notification storm
/// is worse than a dropped reconciliation (the provider sends follow-up
/// notifications for settled charges anyway). The body is read as raw bytes
/// so a malformed payload is swallowed rather than rejected by the JSON
/// extractor.
#[axum::debug_handler]
pub async fn handle_mercadopago(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonValue>) {
    let ack = (StatusCode::OK, Json(json!({ "status": "ok" })));

    let payload: JsonValue = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable provider notification");
            return ack;
        }
    };

    state.reconciliation_service.process_notification(&payload).await;
    ack
}
