use iqtest_backend::services::sweeper_service::SweeperService;
use iqtest_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    if config.mp_access_token.starts_with("TEST-") {
        tracing::warn!("MP_ACCESS_TOKEN is a TEST credential, payments will not settle for real");
    }

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    {
        let sweeper = SweeperService::new(app_state.test_service.clone());
        let interval = Duration::from_secs(config.sweep_interval_secs);
        tokio::spawn(sweeper.run(interval, shutdown_rx));
    }

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    let _ = shutdown_tx.send(true);
    Ok(())
}
