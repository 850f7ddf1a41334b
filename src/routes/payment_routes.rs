use axum::{extract::State, Json};

use crate::config::get_config;
use crate::dto::payment_dto::{CreatePaymentRequest, CreatePaymentResponse};
use crate::services::gateway_service::NewCharge;
use crate::utils::qr;
use crate::AppState;

const PAYMENT_DESCRIPTION: &str = "Teste de QI - Resultado Completo";
/// Charges expire two hours after creation; the record itself lives 24h.
const CHARGE_EXPIRATION_SECS: i64 = 7200;

#[axum::debug_handler]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> crate::error::Result<Json<CreatePaymentResponse>> {
    let config = get_config();
    let record = state.test_service.get_test(&req.id).await?;

    let charge = state
        .gateway
        .create_charge(&NewCharge {
            amount: config.payment_amount,
            description: PAYMENT_DESCRIPTION.to_string(),
            payer_email: record.customer_email.clone(),
            external_reference: record.uuid.clone(),
            notification_url: format!("{}/webhook/mercadopago", config.base_url),
            expires_in: chrono::Duration::seconds(CHARGE_EXPIRATION_SECS),
        })
        .await?;
    tracing::info!(id = %record.uuid, payment_id = %charge.id, "charge created");

    // The provider does not always include a rendered QR image; fall back to
    // rendering the PIX copy-paste text locally.
    let qr_code_base64 = match charge.qr_code_base64 {
        Some(b64) => Some(b64),
        None if !charge.qr_code_text.is_empty() => {
            match qr::encode_png_base64(&charge.qr_code_text) {
                Ok(b64) => Some(b64),
                Err(e) => {
                    tracing::warn!(error = ?e, "local QR render failed");
                    None
                }
            }
        }
        None => None,
    };

    state
        .test_service
        .attach_payment(&record.uuid, &charge.id, qr_code_base64.as_deref())
        .await?;

    Ok(Json(CreatePaymentResponse {
        payment_id: charge.id,
        qr_code_base64,
        qr_code_text: charge.qr_code_text,
        expires_in_seconds: CHARGE_EXPIRATION_SECS,
    }))
}
