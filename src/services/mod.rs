pub mod gateway_service;
pub mod reconciliation_service;
pub mod scoring_service;
pub mod sweeper_service;
pub mod test_service;
