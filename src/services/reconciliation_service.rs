use crate::models::test_record::PaymentStatus;
use crate::services::gateway_service::PaymentGateway;
use crate::services::test_service::TestService;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Reconciles inbound provider notifications with locally stored records.
/// Notifications may arrive zero, one, or many times and out of order; the
/// provider treats any non-2xx acknowledgment as a delivery failure and
/// retries, so every internal failure here is absorbed, not propagated.
#[derive(Clone)]
pub struct ReconciliationService {
    tests: TestService,
    gateway: Arc<dyn PaymentGateway>,
}

impl ReconciliationService {
    pub fn new(tests: TestService, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { tests, gateway }
    }

    pub async fn process_notification(&self, payload: &JsonValue) {
        let charge_id = extract_charge_id(payload);
        let action = payload
            .get("action")
            .and_then(|v| v.as_str())
            .or_else(|| payload.get("type").and_then(|v| v.as_str()))
            .unwrap_or("")
            .to_string();

        if let Err(e) = self
            .tests
            .log_webhook(charge_id.as_deref(), &action, payload)
            .await
        {
            tracing::warn!(error = ?e, "failed to persist webhook log");
        }

        if !is_payment_event(payload) {
            tracing::debug!(action = %action, "ignoring non-payment notification");
            return;
        }

        let Some(charge_id) = charge_id else {
            tracing::warn!("payment notification without a charge id");
            return;
        };

        let info = match self.gateway.get_charge(&charge_id).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(
                    charge_id = %charge_id,
                    error = ?e,
                    "charge lookup failed, deferring to the provider's retry"
                );
                return;
            }
        };

        let Some(mapped) = map_provider_status(&info.status) else {
            tracing::info!(
                charge_id = %charge_id,
                status = %info.status,
                "charge not settled yet"
            );
            return;
        };

        let Some(reference) = info.external_reference else {
            tracing::warn!(charge_id = %charge_id, "charge carries no external reference");
            return;
        };

        match self.tests.update_payment_status(&reference, mapped).await {
            Ok(true) => {
                tracing::info!(
                    charge_id = %charge_id,
                    reference = %reference,
                    status = mapped.as_str(),
                    "payment status updated"
                );
            }
            Ok(false) => {
                tracing::info!(
                    charge_id = %charge_id,
                    reference = %reference,
                    "no pending test matched the notification"
                );
            }
            Err(e) => {
                tracing::error!(
                    charge_id = %charge_id,
                    reference = %reference,
                    error = ?e,
                    "failed to update payment status"
                );
            }
        }
    }
}

pub fn is_payment_event(payload: &JsonValue) -> bool {
    payload.get("action").and_then(|v| v.as_str()) == Some("payment.updated")
        || payload.get("type").and_then(|v| v.as_str()) == Some("payment")
}

pub fn extract_charge_id(payload: &JsonValue) -> Option<String> {
    match payload.get("data")?.get("id")? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Only settled provider statuses move a record; everything else leaves it
/// pending until a later notification or manual check.
pub fn map_provider_status(status: &str) -> Option<PaymentStatus> {
    match status {
        "approved" | "authorized" => Some(PaymentStatus::Approved),
        "rejected" | "cancelled" => Some(PaymentStatus::Rejected),
        _ => None,
    }
}
