// 🌐 Web Server - Catalog page and JSON API with Axum
//
// The catalog is shared read-only. Every request builds its own view from
// the query string; collection totals are computed once at startup.

use crate::catalog::{Catalog, CatalogItem};
use crate::render::{CatalogRenderer, HtmlRenderer, PriceBlock};
use crate::session::BrowseSession;
use crate::totals::{aggregate, effective_amount, Totals};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    collection: Totals,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let collection = aggregate(catalog.items());
        Self {
            catalog: Arc::new(catalog),
            collection,
        }
    }

    fn session(&self) -> BrowseSession<'_> {
        BrowseSession::with_collection_totals(&self.catalog, self.collection)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Item as returned by the API, with its computed prices
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    #[serde(flatten)]
    item: CatalogItem,
    effective_price: f64,
    display_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount: Option<String>,
}

impl From<&CatalogItem> for ItemResponse {
    fn from(item: &CatalogItem) -> Self {
        let block = PriceBlock::for_item(item);
        let discount = match &block {
            PriceBlock::Sale { discount, .. } => discount.clone(),
            _ => None,
        };

        Self {
            item: item.clone(),
            effective_price: effective_amount(item),
            display_price: block.current(),
            discount,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsResponse {
    query: String,
    count: usize,
    collection: Totals,
    search: Totals,
}

/// Payload for the page's live search: new grid plus filtered totals
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FragmentResponse {
    results: String,
    search_price: String,
    search_sale: String,
    count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/items?q= - Matching items
async fn get_items(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    let mut session = state.session();
    session.set_query(&params.q);

    let items: Vec<ItemResponse> = session.filtered().map(ItemResponse::from).collect();
    info!(query = %params.q, matches = items.len(), "items requested");

    (StatusCode::OK, Json(ApiResponse::ok(items)))
}

/// GET /api/totals?q= - Collection and search totals
async fn get_totals(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    let mut session = state.session();
    session.set_query(&params.q);

    let response = TotalsResponse {
        query: params.q.clone(),
        count: session.filtered_len(),
        collection: session.collection_totals(),
        search: session.search_totals(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response)))
}

/// GET /?q= - Full page
async fn serve_page(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    let mut session = state.session();
    session.set_query(&params.q);

    let mut renderer = HtmlRenderer::new();
    renderer.render(&session.view());

    Html(renderer.page())
}

/// GET /fragment?q= - Results grid and search totals for the input listener
async fn serve_fragment(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    let mut session = state.session();
    session.set_query(&params.q);

    let mut renderer = HtmlRenderer::new();
    session.render(&mut renderer);
    let (search_price, search_sale) = renderer.search_totals().clone();

    Json(FragmentResponse {
        results: renderer.results_html().to_string(),
        search_price,
        search_sale,
        count: session.filtered_len(),
    })
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/items", get(get_items))
        .route("/totals", get(get_totals))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_page))
        .route("/fragment", get(serve_fragment))
        .with_state(state)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Goku")
                .with_series("DBZ")
                .with_price("50")
                .with_sale_price("40")
                .with_image("goku.jpg"),
            CatalogItem::new("Luffy").with_series("One Piece").with_price("30"),
        ]);
        router(AppState::new(catalog), Path::new("web"))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_text(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_totals_for_query() {
        let (status, body) = get_json("/api/totals?q=dbz").await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["count"], 1);
        assert_eq!(data["collection"]["totalPrice"], 80.0);
        assert_eq!(data["collection"]["totalEffective"], 70.0);
        assert_eq!(data["search"]["totalPrice"], 50.0);
        assert_eq!(data["search"]["totalEffective"], 40.0);
    }

    #[tokio::test]
    async fn test_items_without_query_returns_all() {
        let (_, body) = get_json("/api/items").await;
        let items = body["data"].as_array().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Goku");
        assert_eq!(items[0]["salePrice"], "40");
        assert_eq!(items[0]["discount"], "20.00");
        assert_eq!(items[0]["displayPrice"], "$40.00");
        assert_eq!(items[1]["effectivePrice"], 30.0);
    }

    #[tokio::test]
    async fn test_items_query_is_decoded() {
        let (_, body) = get_json("/api/items?q=one%20piece").await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Luffy");
    }

    #[tokio::test]
    async fn test_page_renders_totals_and_cards() {
        let (status, html) = get_text("/?q=luffy").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"total-price\">80.00<"));
        assert!(html.contains("id=\"search-price\">30.00<"));
        assert!(html.contains("<a href=\"\">Luffy</a>"));
        assert!(!html.contains(">Goku</a>"));
    }

    #[tokio::test]
    async fn test_fragment_no_results() {
        let (_, body) = get_json("/fragment?q=naruto").await;
        assert_eq!(body["results"], "<p>No results found.</p>");
        assert_eq!(body["searchPrice"], "0.00");
        assert_eq!(body["searchSale"], "0.00");
        assert_eq!(body["count"], 0);
    }
}
