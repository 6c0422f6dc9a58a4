// 🗂️ Catalog - Items loaded once at startup, never mutated afterwards
//
// Sources are JSON arrays or CSV tables. The catalog is the concatenation of
// every source in the order given (figures first, then plushes by default).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// PRICE VALUE
// ============================================================================

/// Raw price field as found in the source data.
///
/// Prices arrive as numbers, as text ("49.99", "12 USD") or as whatever the
/// catalog author typed. Nothing is rejected at load time; `price::normalize`
/// decides what the value is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for PriceValue {
    fn from(value: f64) -> Self {
        PriceValue::Number(value)
    }
}

impl From<&str> for PriceValue {
    fn from(value: &str) -> Self {
        PriceValue::Text(value.to_string())
    }
}

// ============================================================================
// CATALOG ITEM
// ============================================================================

/// One collectible. Text fields default to empty when missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub series: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub character: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub manufacturer: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub item_type: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceValue>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<PriceValue>,

    // Presentation only
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_series(mut self, series: &str) -> Self {
        self.series = series.to_string();
        self
    }

    pub fn with_character(mut self, character: &str) -> Self {
        self.character = character.to_string();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = manufacturer.to_string();
        self
    }

    pub fn with_type(mut self, item_type: &str) -> Self {
        self.item_type = item_type.to_string();
        self
    }

    pub fn with_price(mut self, price: impl Into<PriceValue>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_sale_price(mut self, sale_price: impl Into<PriceValue>) -> Self {
        self.sale_price = Some(sale_price.into());
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = image.to_string();
        self
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = link.to_string();
        self
    }
}

/// CSV rows carry every column as text; empty price cells mean "no price".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvItemRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    series: String,
    #[serde(default)]
    character: String,
    #[serde(default)]
    manufacturer: String,
    #[serde(rename = "type", default)]
    item_type: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    sale_price: Option<String>,
    #[serde(default)]
    image: String,
    #[serde(default)]
    link: String,
}

impl From<CsvItemRow> for CatalogItem {
    fn from(row: CsvItemRow) -> Self {
        Self {
            name: row.name,
            series: row.series,
            character: row.character,
            manufacturer: row.manufacturer,
            item_type: row.item_type,
            price: row.price.map(PriceValue::Text),
            sale_price: row.sale_price.map(PriceValue::Text),
            image: row.image,
            link: row.link,
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// The fixed, ordered collection for one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Concatenate source lists, keeping source order and item order.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<CatalogItem>>,
    {
        Self {
            items: sources.into_iter().flatten().collect(),
        }
    }

    /// Load every source file and concatenate them.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(load_source(path)?);
        }

        let catalog = Self::from_sources(sources);
        debug!(sources = paths.len(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&CatalogItem> {
        self.items.get(position)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load one source, picking the format from the file extension.
pub fn load_source(path: &Path) -> Result<Vec<CatalogItem>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let items = match extension.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => bail!("Unsupported catalog source (expected .json or .csv): {}", path.display()),
    };

    debug!(path = %path.display(), items = items.len(), "catalog source read");
    Ok(items)
}

pub fn load_json(path: &Path) -> Result<Vec<CatalogItem>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    parse_json(&content).with_context(|| format!("Invalid catalog JSON in {}", path.display()))
}

pub fn parse_json(content: &str) -> Result<Vec<CatalogItem>> {
    let items: Vec<CatalogItem> =
        serde_json::from_str(content).context("Failed to deserialize catalog items")?;
    Ok(items)
}

pub fn load_csv(path: &Path) -> Result<Vec<CatalogItem>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut items = Vec::new();
    for (index, result) in rdr.deserialize::<CsvItemRow>().enumerate() {
        // +2: header row and 1-based line numbers
        let row = result.with_context(|| {
            format!("Failed to deserialize item on line {} of {}", index + 2, path.display())
        })?;
        items.push(row.into());
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_json_mixed_price_shapes() {
        let items = parse_json(
            r#"[
                {"name": "Goku", "series": "DBZ", "price": "50", "salePrice": 40},
                {"name": "Luffy", "series": "One Piece", "price": 30, "salePrice": null},
                {"name": "Odd", "price": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price, Some(PriceValue::Text("50".to_string())));
        assert_eq!(items[0].sale_price, Some(PriceValue::Number(40.0)));
        assert_eq!(items[1].sale_price, None);
        assert_eq!(items[2].price, Some(PriceValue::Other(serde_json::json!(true))));
    }

    #[test]
    fn test_missing_and_null_text_fields_become_empty() {
        let items = parse_json(r#"[{"name": "Chopper", "series": null}]"#).unwrap();

        assert_eq!(items[0].name, "Chopper");
        assert_eq!(items[0].series, "");
        assert_eq!(items[0].manufacturer, "");
        assert_eq!(items[0].item_type, "");
        assert!(items[0].price.is_none());
    }

    #[test]
    fn test_type_field_uses_json_key_type() {
        let items = parse_json(r#"[{"name": "Pikachu", "type": "Plush"}]"#).unwrap();
        assert_eq!(items[0].item_type, "Plush");
    }

    #[test]
    fn test_from_sources_keeps_order() {
        let figures = vec![CatalogItem::new("Goku"), CatalogItem::new("Vegeta")];
        let plushes = vec![CatalogItem::new("Pikachu")];

        let catalog = Catalog::from_sources(vec![figures, plushes]);

        let names: Vec<&str> = catalog.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Goku", "Vegeta", "Pikachu"]);
    }

    #[test]
    fn test_load_csv_prices_are_text() {
        let file = temp_with(
            ".csv",
            "name,series,character,manufacturer,type,price,salePrice,image,link\n\
             Goku,DBZ,Goku,Bandai,Figure,50,40,goku.jpg,https://example.com/goku\n\
             Luffy,One Piece,Luffy,Banpresto,Figure,30,,luffy.jpg,\n",
        );

        let items = load_source(file.path()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price, Some(PriceValue::Text("50".to_string())));
        assert_eq!(items[0].sale_price, Some(PriceValue::Text("40".to_string())));
        assert_eq!(items[1].sale_price, None);
        assert_eq!(items[1].link, "");
    }

    #[test]
    fn test_load_concatenates_json_and_csv() {
        let json = temp_with(".json", r#"[{"name": "Goku", "price": 50}]"#);
        let csv = temp_with(".csv", "name,price\nPikachu,20\n");

        let catalog = Catalog::load(&[json.path().to_path_buf(), csv.path().to_path_buf()]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name, "Goku");
        assert_eq!(catalog.get(1).unwrap().name, "Pikachu");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = temp_with(".txt", "[]");
        let err = load_source(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported catalog source"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_json(Path::new("/nonexistent/figures.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/figures.json"));
    }

    #[test]
    fn test_malformed_json_fails() {
        let file = temp_with(".json", "{ not an array");
        assert!(load_source(file.path()).is_err());
    }
}
