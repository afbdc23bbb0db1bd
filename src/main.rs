use anyhow::Context;
use dopc::utils::{logger, validation::Validate};
use dopc::{router, AppState, CliConfig, ConfigProvider, HomeApiClient, PriceEngine, TomlConfig};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse_args();

    match &cli.config {
        Some(path) => {
            let mut file = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            cli.apply_to(&mut file);
            start(&file, file.is_verbose()).await
        }
        None => start(&cli, cli.verbose).await,
    }
}

async fn start<C: ConfigProvider + Validate>(config: &C, verbose: bool) -> anyhow::Result<()> {
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let client = Arc::new(HomeApiClient::from_config(config)?);
    let engine = PriceEngine::new(client.clone(), client).with_deadline(config.request_deadline());
    let app = router(AppState { engine });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        upstream = config.api_base_url(),
        deadline = ?config.request_deadline(),
        "DOPC listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
