use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tabsplit::config::CONFIG;
use tabsplit::{InMemoryLogging, InMemoryStorage, LedgerService, api};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&CONFIG.log_level))
        .init();
    info!("Loaded configuration: {:?}", *CONFIG);

    let service = Arc::new(
        LedgerService::new(InMemoryStorage::new(), InMemoryLogging::new()).with_max_amount(CONFIG.max_expense_amount),
    );
    let app = api::app(service, Duration::from_secs(CONFIG.request_timeout_secs));

    let addr = SocketAddr::new(CONFIG.bind_addr, CONFIG.port);
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
