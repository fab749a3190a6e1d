// server/src/main.rs

mod page;
mod routes;

use std::sync::Arc;

use common_utils::{load_env_files, AppConfig};
use expert_core::ExpertError;
use expert_llm::OpenAiChatClient;
use orchestrator::{submission, PersonaRegistry, ResponseService};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Everything that can fail before the first request is served.
fn build_service() -> Result<(AppConfig, ResponseService), ExpertError> {
    let config = AppConfig::from_env()?;
    let client = OpenAiChatClient::new(&config.llm)?;
    let service = ResponseService::new(PersonaRegistry::builtin(), Arc::new(client));
    Ok((config, service))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[Server] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("[Server] Shutting down...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_report = load_env_files();
    init_tracing();
    env_report.log();
    tracing::info!("[Server] Initializing...");

    let (config, service) = match build_service() {
        Ok(ready) => ready,
        Err(e) => {
            let message = submission::startup_failure_message(&e);
            tracing::error!("[Server] {}", message);
            anyhow::bail!(message);
        }
    };

    let app = routes::app(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    tracing::info!("[Server] Expert form listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
