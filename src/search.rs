// 🔍 Search - Case-insensitive substring match across five text fields
//
// An item matches when the query appears in its name, series, manufacturer,
// character or type. The empty query matches everything.

use crate::catalog::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Series,
    Manufacturer,
    Character,
    Type,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Name,
        SearchField::Series,
        SearchField::Manufacturer,
        SearchField::Character,
        SearchField::Type,
    ];

    pub fn value<'a>(&self, item: &'a CatalogItem) -> &'a str {
        match self {
            SearchField::Name => &item.name,
            SearchField::Series => &item.series,
            SearchField::Manufacturer => &item.manufacturer,
            SearchField::Character => &item.character,
            SearchField::Type => &item.item_type,
        }
    }
}

/// A query lowercased once, ready to test many items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Fields of `item` that contain the query.
    pub fn matching_fields(&self, item: &CatalogItem) -> Vec<SearchField> {
        SearchField::ALL
            .into_iter()
            .filter(|field| field.value(item).to_lowercase().contains(&self.needle))
            .collect()
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        SearchField::ALL
            .iter()
            .any(|field| field.value(item).to_lowercase().contains(&self.needle))
    }
}

/// Order-preserving subsequence of `items` matching `query`.
pub fn filter<'a>(items: &'a [CatalogItem], query: &str) -> Vec<&'a CatalogItem> {
    let query = SearchQuery::new(query);
    items.iter().filter(|item| query.matches(item)).collect()
}

/// Positions (into `items`) of the same subsequence `filter` returns.
pub fn filter_positions(items: &[CatalogItem], query: &str) -> Vec<usize> {
    let query = SearchQuery::new(query);
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.matches(item))
        .map(|(position, _)| position)
        .collect()
}
