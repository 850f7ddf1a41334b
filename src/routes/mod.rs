pub mod health;
pub mod payment_routes;
pub mod test_routes;
pub mod webhook;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/stats", get(health::stats))
        .route("/submit_test", post(test_routes::submit_test))
        .route("/create_payment", post(payment_routes::create_payment))
        .route("/webhook/mercadopago", post(webhook::handle_mercadopago))
        .route("/check_payment/:id", get(test_routes::check_payment))
        .route("/get_result/:id", get(test_routes::get_result))
        .with_state(state)
}
