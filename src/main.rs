use anyhow::Result;
use shelfmate::{BookService, config::Config, http::start_http_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    shelfmate::init_tracing(&config.runtime.log_level);
    config.log_load_warnings();

    info!(
        "Starting shelfmate (snapshot dir {})",
        config.snapshot.dir.display()
    );

    let service = BookService::load(&config).map_err(|e| {
        eprintln!("Failed to load snapshot: {}", e);
        e
    })?;

    start_http_server(service, config.runtime.http_bind).await?;

    Ok(())
}
