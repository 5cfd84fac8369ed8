use std::sync::Arc;

use soccer_stats::{
    app_router, init_logging, log_app_bind, log_app_start, logging_config_from_env, AppConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let config = AppConfig::from_env()?;
    let ctx = Arc::new(config.build_context()?);
    let app = app_router(ctx);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let bound_addr = listener.local_addr()?;

    log_app_bind(bound_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
