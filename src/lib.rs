pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    gateway_service::{MercadoPagoGateway, PaymentGateway},
    reconciliation_service::ReconciliationService,
    test_service::TestService,
};
use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub test_service: TestService,
    pub gateway: Arc<dyn PaymentGateway>,
    pub reconciliation_service: ReconciliationService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();

        let gateway: Arc<dyn PaymentGateway> = Arc::new(MercadoPagoGateway::new(
            config.mp_access_token.clone(),
            http_client,
        ));
        Self::with_gateway(pool, gateway)
    }

    /// Builds the state around an alternate gateway implementation; used by
    /// the integration tests to stub the provider.
    pub fn with_gateway(pool: SqlitePool, gateway: Arc<dyn PaymentGateway>) -> Self {
        let test_service = TestService::new(pool.clone());
        let reconciliation_service =
            ReconciliationService::new(test_service.clone(), gateway.clone());

        Self {
            pool,
            test_service,
            gateway,
            reconciliation_service,
        }
    }
}
