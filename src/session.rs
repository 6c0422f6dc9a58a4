// 🧭 Browse Session - Search input in, filtered view and totals out
//
// Collection totals are computed once. Every query change refilters and
// re-aggregates in one step; nothing is patched incrementally.

use crate::catalog::{Catalog, CatalogItem};
use crate::render::{CatalogRenderer, CatalogView};
use crate::search::filter_positions;
use crate::totals::{aggregate, Totals};
use tracing::debug;

// ============================================================================
// LIGHTBOX
// ============================================================================

/// Full-size image preview overlay. Any dismissal clears the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    image: Option<String>,
}

impl Lightbox {
    /// Show `image`. Items without an image leave the overlay closed.
    pub fn open(&mut self, image: &str) {
        if image.is_empty() {
            return;
        }
        self.image = Some(image.to_string());
    }

    pub fn dismiss(&mut self) {
        self.image = None;
    }

    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Debug, Clone)]
pub struct BrowseSession<'a> {
    catalog: &'a Catalog,
    collection: Totals,
    query: String,
    positions: Vec<usize>,
    search: Totals,
    lightbox: Lightbox,
}

impl<'a> BrowseSession<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_collection_totals(catalog, aggregate(catalog.items()))
    }

    /// Reuse collection totals computed earlier for the same catalog.
    pub fn with_collection_totals(catalog: &'a Catalog, collection: Totals) -> Self {
        let mut session = Self {
            catalog,
            collection,
            query: String::new(),
            positions: Vec::new(),
            search: Totals::default(),
            lightbox: Lightbox::default(),
        };
        session.set_query("");
        session
    }

    /// Refilter and re-aggregate for a new query.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.positions = filter_positions(self.catalog.items(), query);
        self.search = aggregate(self.filtered());

        debug!(query, matches = self.positions.len(), "search updated");
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn filtered(&self) -> impl Iterator<Item = &'a CatalogItem> + '_ {
        let catalog = self.catalog;
        self.positions.iter().filter_map(move |p| catalog.get(*p))
    }

    pub fn filtered_len(&self) -> usize {
        self.positions.len()
    }

    /// Item at `row` of the filtered view.
    pub fn item_at(&self, row: usize) -> Option<&'a CatalogItem> {
        self.positions.get(row).and_then(|p| self.catalog.get(*p))
    }

    pub fn collection_totals(&self) -> Totals {
        self.collection
    }

    pub fn search_totals(&self) -> Totals {
        self.search
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            query: &self.query,
            items: self.filtered().collect(),
            collection: self.collection,
            search: self.search,
        }
    }

    pub fn render<R: CatalogRenderer>(&self, renderer: &mut R) {
        renderer.render(&self.view());
    }

    // ------------------------------------------------------------------------
    // Image preview
    // ------------------------------------------------------------------------

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Open the preview for the item at `row` of the filtered view.
    pub fn open_preview(&mut self, row: usize) {
        if let Some(item) = self.item_at(row) {
            self.lightbox.open(&item.image);
        }
    }

    pub fn dismiss_preview(&mut self) {
        self.lightbox.dismiss();
    }
}
