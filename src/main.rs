use anyhow::Context;
use dotenvy::dotenv;
use gradebook::logging::init_tracing;
use gradebook::metrics::{init_metrics, metrics_app};
use gradebook::router::init_router;
use gradebook::state::init_app_state;
use gradebook_config::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let prometheus = init_metrics()?;
    let state = init_app_state().await?;

    let mut app = init_router(state);
    if let Some(handle) = prometheus {
        app = app.merge(metrics_app(handle));
        info!("Prometheus metrics exposed at /metrics");
    }

    let server = ServerConfig::from_env();
    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Server listening");
    println!("🚀 Server running on http://{address}");
    println!("📚 Swagger UI available at http://{address}/swagger-ui");
    println!("📖 Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
