// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use figure_catalog::{BrowseSession, Catalog, CatalogRenderer, Config, TextRenderer};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("search") => run_search(&args[2..].join(" "))?,
        Some("totals") => run_totals()?,
        Some("tui") | None => run_ui_mode()?,
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: figure-catalog [tui | search <query> | totals]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn load_catalog() -> Result<Catalog> {
    let config = Config::from_env()?;
    let catalog = Catalog::load(&config.sources)?;
    Ok(catalog)
}

fn run_search(query: &str) -> Result<()> {
    let catalog = load_catalog()?;
    let mut session = BrowseSession::new(&catalog);
    session.set_query(query);

    let mut renderer = TextRenderer::new();
    renderer.render(&session.view());

    for line in renderer.lines() {
        println!("{}", line);
    }

    Ok(())
}

fn run_totals() -> Result<()> {
    let catalog = load_catalog()?;
    let session = BrowseSession::new(&catalog);
    let (price, sale) = session.collection_totals().formatted();

    println!("📦 Items:       {}", catalog.len());
    println!("💰 Total price: {}", price);
    println!("🏷️  Total sale:  {}", sale);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    println!("🖥️  Loading figure collection...\n");

    let catalog = load_catalog()?;
    println!("✓ Loaded {} items\n", catalog.len());

    let mut app = ui::App::new(BrowseSession::new(&catalog));
    ui::run_ui(&mut app)?;

    println!("\n✅ Catalog browser closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin catalog-server --features server");
    std::process::exit(1);
}
