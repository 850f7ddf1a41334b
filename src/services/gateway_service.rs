use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

const MP_API_BASE: &str = "https://api.mercadopago.com";

/// Parameters for a new PIX charge.
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub amount: f64,
    pub description: String,
    pub payer_email: String,
    /// Correlation id echoed back by the provider; equals the test uuid.
    pub external_reference: String,
    pub notification_url: String,
    pub expires_in: chrono::Duration,
}

#[derive(Debug, Clone)]
pub struct Charge {
    pub id: String,
    pub qr_code_text: String,
    pub qr_code_base64: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChargeInfo {
    /// Raw provider status: approved, authorized, rejected, cancelled,
    /// pending, in_process, ...
    pub status: String,
    pub external_reference: Option<String>,
}

/// Contract with the payment provider. Only charge creation and status
/// lookup are consumed; everything else about the provider is opaque.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge(&self, charge: &NewCharge) -> Result<Charge>;
    async fn get_charge(&self, charge_id: &str) -> Result<ChargeInfo>;
}

pub struct MercadoPagoGateway {
    client: Client,
    access_token: String,
    base_url: String,
}

impl MercadoPagoGateway {
    pub fn new(access_token: String, client: Client) -> Self {
        Self {
            client,
            access_token,
            base_url: MP_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
    async fn create_charge(&self, charge: &NewCharge) -> Result<Charge> {
        let body = json!({
            "transaction_amount": charge.amount,
            "description": charge.description,
            "payment_method_id": "pix",
            "payer": {
                "email": charge.payer_email,
                "first_name": "Cliente",
                "last_name": "QI",
            },
            "external_reference": charge.external_reference,
            "notification_url": charge.notification_url,
            "date_of_expiration": (Utc::now() + charge.expires_in).to_rfc3339(),
        });

        let response = self
            .client
            .post(format!("{}/v1/payments", self.base_url))
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(Error::Gateway {
                status: Some(status.as_u16()),
                details,
            });
        }

        let payment: JsonValue = response.json().await?;
        let id = charge_id_string(&payment).ok_or_else(|| Error::Gateway {
            status: None,
            details: "payment response is missing an id".to_string(),
        })?;
        let pix = &payment["point_of_interaction"]["transaction_data"];

        Ok(Charge {
            id,
            qr_code_text: pix["qr_code"].as_str().unwrap_or_default().to_string(),
            qr_code_base64: pix["qr_code_base64"]
                .as_str()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    async fn get_charge(&self, charge_id: &str) -> Result<ChargeInfo> {
        let response = self
            .client
            .get(format!("{}/v1/payments/{}", self.base_url, charge_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(Error::Gateway {
                status: Some(status.as_u16()),
                details,
            });
        }

        let payment: JsonValue = response.json().await?;
        Ok(ChargeInfo {
            status: payment["status"].as_str().unwrap_or_default().to_string(),
            external_reference: payment["external_reference"]
                .as_str()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// The provider sends charge ids both as JSON numbers and as strings.
pub fn charge_id_string(value: &JsonValue) -> Option<String> {
    match &value["id"] {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
