use demo_service::config::DemoConfig;
use demo_service::services::init_metrics;
use demo_service::Application;
use service_core::observability::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DemoConfig::load()?;

    init_tracing(
        "demo-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start demo-service: {}", e);
        e
    })?;
    let result = application.run_until_stopped().await;

    shutdown_tracing();
    result?;

    Ok(())
}
