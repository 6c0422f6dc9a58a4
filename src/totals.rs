// 🧮 Totals - List price and effective (sale) price sums
//
// Effective price = sale price when positive, else list price. An item with
// no usable sale price still counts its list price toward the sale total.

use crate::catalog::CatalogItem;
use crate::price::{format_amount, normalize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_price: f64,
    pub total_effective: f64,
}

impl Totals {
    /// Both sums as two-decimal text: (price, effective).
    pub fn formatted(&self) -> (String, String) {
        (format_amount(self.total_price), format_amount(self.total_effective))
    }
}

/// Normalized list price of one item.
pub fn list_amount(item: &CatalogItem) -> f64 {
    normalize(item.price.as_ref())
}

/// Normalized sale price of one item (0 when absent or unusable).
pub fn sale_amount(item: &CatalogItem) -> f64 {
    normalize(item.sale_price.as_ref())
}

/// What one item contributes to the effective total.
pub fn effective_amount(item: &CatalogItem) -> f64 {
    let sale = sale_amount(item);
    if sale > 0.0 {
        sale
    } else {
        list_amount(item)
    }
}

/// Sum list and effective prices over a sequence of items.
pub fn aggregate<'a, I>(items: I) -> Totals
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    items.into_iter().fold(Totals::default(), |mut totals, item| {
        totals.total_price += list_amount(item);
        totals.total_effective += effective_amount(item);
        totals
    })
}
