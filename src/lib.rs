// Figure Catalog - Core Library
// Exposes the catalog, search and totals for the terminal browser, the web
// server and tests

pub mod catalog;
pub mod config;
pub mod price;
pub mod render;
pub mod search;
pub mod session;
pub mod totals;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogItem, PriceValue,
    load_source, load_json, load_csv, parse_json,
};
pub use config::Config;
pub use price::{
    normalize, parse_leading_float, to_fixed, format_amount, format_currency, discount_percent,
};
pub use render::{
    CatalogRenderer, CatalogView, HtmlRenderer, PriceBlock, TextRenderer, NO_RESULTS,
};
pub use search::{filter, filter_positions, SearchField, SearchQuery};
pub use session::{BrowseSession, Lightbox};
pub use totals::{aggregate, effective_amount, Totals};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
