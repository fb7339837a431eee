use books_metrics_http::{router, AppConfig, MetricsResponder};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let responder = MetricsResponder::new(config.books_source());

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        port = config.port,
        source = ?config.source,
        api_url = %config.api_url,
        "server running"
    );

    axum::serve(listener, router(responder)).await?;
    Ok(())
}
