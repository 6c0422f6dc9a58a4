// Figure Catalog - Web Server
// Serves the catalog page and JSON API with Axum

use anyhow::{Context, Result};
use figure_catalog::server::{router, AppState};
use figure_catalog::{Catalog, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🌐 Figure Catalog - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;

    let catalog = match Catalog::load(&config.sources) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("❌ Could not load catalog: {:#}", err);
            eprintln!("   Set CATALOG_SOURCES to your figure and plush files.");
            std::process::exit(1);
        }
    };
    println!("✓ Catalog loaded: {} items from {} sources", catalog.len(), config.sources.len());

    let app = router(AppState::new(catalog), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/items", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server stopped unexpectedly")?;

    Ok(())
}
