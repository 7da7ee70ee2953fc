pub mod catalog;
pub mod cli;
pub mod config;
pub mod models;
pub mod responder;
pub mod server;
pub mod transcript;

use catalog::fallback::{ FallbackCatalog, FallbackData };
use catalog::remote::RemoteCatalog;
use catalog::service::CatalogService;
use catalog::CatalogSource;
use cli::Args;
use log::{ info, warn };
use server::Server;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Builds the catalog service from `args`. The fallback dataset is loaded
/// synchronously so the service can answer before the backend does.
pub fn build_catalog(args: &Args) -> Result<CatalogService, Box<dyn Error + Send + Sync>> {
    let data = FallbackData::load(args.fallback_data_path.as_deref().map(Path::new)).map_err(|e|
        format!("Failed to load fallback catalog: {}", e)
    )?;
    let fallback = FallbackCatalog::new(data);

    let remote: Option<Arc<dyn CatalogSource>> = if args.skip_remote_fetch {
        info!("Remote catalog disabled, serving fallback data only");
        None
    } else {
        let timeout = Duration::from_secs(args.catalog_timeout_secs);
        let remote = RemoteCatalog::new(&args.catalog_api_url, timeout).map_err(|e|
            format!("Invalid catalog API URL '{}': {}", args.catalog_api_url, e)
        )?;
        Some(Arc::new(remote))
    };

    Ok(CatalogService::new(remote, fallback))
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    match args.http_port {
        Some(port) => info!("HTTP API Port: {}", port),
        None => info!("HTTP API: disabled"),
    }
    info!("Catalog API URL: {}", args.catalog_api_url);
    info!("Catalog Timeout: {}s", args.catalog_timeout_secs);
    info!("Fallback Data: {}", args.fallback_data_path.as_deref().unwrap_or("(bundled)"));
    info!("Skip Remote Fetch: {}", args.skip_remote_fetch);
    info!("Reply Delay: {}-{} ms", args.reply_delay_min_ms, args.reply_delay_max_ms);
    info!("Contact Link: {}", args.contact_link);
    info!("-------------------------");

    let catalog = build_catalog(&args)?;
    let initial = catalog.snapshot().await;
    info!(
        "Serving fallback catalog: {} products, {} categories",
        initial.products.len(),
        initial.categories.len()
    );

    if !args.skip_remote_fetch {
        let background = catalog.clone();
        tokio::spawn(async move {
            if background.refresh().await.is_err() {
                warn!("Initial catalog fetch failed, continuing with fallback data");
            }
        });
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, catalog, args);
    server.run().await?;

    Ok(())
}
