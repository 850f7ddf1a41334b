use crate::error::Result;
use crate::services::test_service::TestService;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;

/// Periodically purges expired pending test records. Settled records are
/// never touched.
#[derive(Clone)]
pub struct SweeperService {
    tests: TestService,
}

impl SweeperService {
    pub fn new(tests: TestService) -> Self {
        Self { tests }
    }

    pub async fn run_once(&self) -> Result<u64> {
        let removed = self.tests.sweep_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "expired pending tests removed");
        }
        Ok(removed)
    }

    /// Loops until the stop signal fires. A failing tick is logged and the
    /// loop keeps going.
    pub async fn run(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::error!(error = ?e, "expiry sweep failed");
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("expiry sweeper stopped");
                    break;
                }
            }
        }
    }
}
