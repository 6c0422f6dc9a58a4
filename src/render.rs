// 🖼️ Rendering - Turn a filtered view into cards and totals
//
// Renderers receive a read-only CatalogView and replace whatever they showed
// before. The browse session decides what is in the view; renderers only
// decide how it looks.

use crate::catalog::CatalogItem;
use crate::price::{discount_percent, format_currency};
use crate::totals::{list_amount, sale_amount, Totals};

pub const NO_RESULTS: &str = "No results found.";
pub const UNPRICED: &str = "-";

const PAGE_TEMPLATE: &str = include_str!("../web/index.html");

// ============================================================================
// VIEW
// ============================================================================

/// Snapshot handed to a renderer for one render pass.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    pub query: &'a str,
    pub items: Vec<&'a CatalogItem>,
    pub collection: Totals,
    pub search: Totals,
}

pub trait CatalogRenderer {
    /// Replace the previous output with `view`.
    fn render(&mut self, view: &CatalogView<'_>);
}

// ============================================================================
// PRICE BLOCK
// ============================================================================

/// What the price area of a card shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceBlock {
    /// Positive sale price. `list` and `discount` are set only when the list
    /// price is positive too.
    Sale {
        list: Option<f64>,
        sale: f64,
        discount: Option<String>,
    },
    List(f64),
    Unpriced,
}

impl PriceBlock {
    pub fn for_item(item: &CatalogItem) -> Self {
        let list = list_amount(item);
        let sale = sale_amount(item);

        if sale > 0.0 {
            PriceBlock::Sale {
                list: (list > 0.0).then_some(list),
                sale,
                discount: discount_percent(list, sale),
            }
        } else if list > 0.0 {
            PriceBlock::List(list)
        } else {
            PriceBlock::Unpriced
        }
    }

    /// The price a shopper pays, as displayed.
    pub fn current(&self) -> String {
        match self {
            PriceBlock::Sale { sale, .. } => format_currency(*sale),
            PriceBlock::List(list) => format_currency(*list),
            PriceBlock::Unpriced => UNPRICED.to_string(),
        }
    }

    /// One-line plain text form.
    pub fn summary(&self) -> String {
        match self {
            PriceBlock::Sale {
                list: Some(list),
                discount,
                ..
            } => {
                let mut text = format!("{} (was {}", self.current(), format_currency(*list));
                if let Some(discount) = discount {
                    text.push_str(&format!(", {}% off", discount));
                }
                text.push(')');
                text
            }
            _ => self.current(),
        }
    }
}

// ============================================================================
// HTML RENDERER
// ============================================================================

/// Renders the results grid as HTML and keeps the four totals strings.
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer {
    query: String,
    results: String,
    collection: (String, String),
    search: (String, String),
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results_html(&self) -> &str {
        &self.results
    }

    pub fn collection_totals(&self) -> &(String, String) {
        &self.collection
    }

    pub fn search_totals(&self) -> &(String, String) {
        &self.search
    }

    /// Full page built from the template and the last render.
    pub fn page(&self) -> String {
        let query = escape_html(&self.query);
        fill_template(PAGE_TEMPLATE, |name| match name {
            "query" => Some(query.as_str()),
            "total_price" => Some(self.collection.0.as_str()),
            "total_sale" => Some(self.collection.1.as_str()),
            "search_price" => Some(self.search.0.as_str()),
            "search_sale" => Some(self.search.1.as_str()),
            "results" => Some(self.results.as_str()),
            _ => None,
        })
    }

    fn card(item: &CatalogItem) -> String {
        let block = PriceBlock::for_item(item);

        let (discount_html, list_html) = match &block {
            PriceBlock::Sale { list, discount, .. } => (
                discount
                    .as_ref()
                    .map(|d| format!("<div class=\"discount\">{}%</div>", d))
                    .unwrap_or_default(),
                list.map(|l| format!("<span class=\"list-price\">{}</span>", format_currency(l)))
                    .unwrap_or_default(),
            ),
            _ => (String::new(), String::new()),
        };

        format!(
            concat!(
                "<div class=\"card\">",
                "<img src=\"{image}\" alt=\"{name}\" class=\"figure-img\">",
                "<div class=\"name\"><a href=\"{link}\">{name}</a></div>",
                "<div class=\"series\">{series}</div>",
                "<div class=\"character\">{character}</div>",
                "<div class=\"pricing\">{discount}<div class=\"price\">{list}{current}</div></div>",
                "</div>"
            ),
            image = escape_html(&item.image),
            name = escape_html(&item.name),
            link = escape_html(&item.link),
            series = escape_html(&item.series),
            character = escape_html(&item.character),
            discount = discount_html,
            list = list_html,
            current = block.current(),
        )
    }
}

impl CatalogRenderer for HtmlRenderer {
    fn render(&mut self, view: &CatalogView<'_>) {
        self.query = view.query.to_string();
        self.collection = view.collection.formatted();
        self.search = view.search.formatted();

        self.results.clear();
        if view.items.is_empty() {
            self.results.push_str(&format!("<p>{}</p>", NO_RESULTS));
            return;
        }

        for item in &view.items {
            self.results.push_str(&Self::card(item));
        }
    }
}

/// Substitute `{{name}}` placeholders in one pass over `template`.
///
/// Inserted values are never scanned again. Unknown placeholders are kept.
pub fn fill_template<'v, F>(template: &str, value: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match value(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// TEXT RENDERER
// ============================================================================

/// Plain lines for terminal output outside the TUI.
#[derive(Debug, Default, Clone)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl CatalogRenderer for TextRenderer {
    fn render(&mut self, view: &CatalogView<'_>) {
        self.lines.clear();

        if view.items.is_empty() {
            self.lines.push(NO_RESULTS.to_string());
        }

        for item in &view.items {
            self.lines.push(format!(
                "{} | {} | {} | {}",
                item.name,
                item.series,
                item.character,
                PriceBlock::for_item(item).summary()
            ));
        }

        let (total_price, total_sale) = view.collection.formatted();
        let (search_price, search_sale) = view.search.formatted();
        self.lines.push(String::new());
        self.lines.push(format!("Collection: {} (sale {})", total_price, total_sale));
        self.lines.push(format!(
            "Search \"{}\": {} items, {} (sale {})",
            view.query,
            view.items.len(),
            search_price,
            search_sale
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totals::aggregate;

    fn goku() -> CatalogItem {
        CatalogItem::new("Goku")
            .with_series("DBZ")
            .with_character("Son Goku")
            .with_price("50")
            .with_sale_price("40")
            .with_image("img/goku.jpg")
            .with_link("https://example.com/goku")
    }

    fn view_of<'a>(items: &'a [CatalogItem], query: &'a str) -> CatalogView<'a> {
        let filtered: Vec<&CatalogItem> = crate::search::filter(items, query);
        CatalogView {
            query,
            collection: aggregate(items),
            search: aggregate(filtered.iter().copied()),
            items: filtered,
        }
    }

    #[test]
    fn test_price_block_sale_with_discount() {
        let block = PriceBlock::for_item(&goku());
        assert_eq!(
            block,
            PriceBlock::Sale {
                list: Some(50.0),
                sale: 40.0,
                discount: Some("20.00".to_string()),
            }
        );
        assert_eq!(block.current(), "$40.00");
        assert_eq!(block.summary(), "$40.00 (was $50.00, 20.00% off)");
    }

    #[test]
    fn test_price_block_sale_without_list() {
        let item = CatalogItem::new("Sanji").with_sale_price("15");
        let block = PriceBlock::for_item(&item);
        assert_eq!(
            block,
            PriceBlock::Sale {
                list: None,
                sale: 15.0,
                discount: None,
            }
        );
        assert_eq!(block.summary(), "$15.00");
    }

    #[test]
    fn test_price_block_list_and_unpriced() {
        let listed = CatalogItem::new("Luffy").with_price("30");
        assert_eq!(PriceBlock::for_item(&listed), PriceBlock::List(30.0));
        assert_eq!(PriceBlock::for_item(&listed).current(), "$30.00");

        let unpriced = CatalogItem::new("Chopper").with_price("TBD");
        assert_eq!(PriceBlock::for_item(&unpriced), PriceBlock::Unpriced);
        assert_eq!(PriceBlock::for_item(&unpriced).current(), "-");
    }

    #[test]
    fn test_html_card_contents() {
        let items = vec![goku()];
        let mut renderer = HtmlRenderer::new();
        renderer.render(&view_of(&items, ""));

        let html = renderer.results_html();
        assert!(html.contains("<img src=\"img/goku.jpg\" alt=\"Goku\" class=\"figure-img\">"));
        assert!(html.contains("<a href=\"https://example.com/goku\">Goku</a>"));
        assert!(html.contains("<div class=\"discount\">20.00%</div>"));
        assert!(html.contains("<span class=\"list-price\">$50.00</span>$40.00"));
        assert_eq!(renderer.collection_totals(), &("50.00".to_string(), "40.00".to_string()));
    }

    #[test]
    fn test_html_no_results() {
        let items = vec![goku()];
        let mut renderer = HtmlRenderer::new();
        renderer.render(&view_of(&items, "naruto"));

        assert_eq!(renderer.results_html(), "<p>No results found.</p>");
        assert_eq!(renderer.search_totals(), &("0.00".to_string(), "0.00".to_string()));
        assert_eq!(renderer.collection_totals(), &("50.00".to_string(), "40.00".to_string()));
    }

    #[test]
    fn test_html_render_replaces_previous_output() {
        let items = vec![goku(), CatalogItem::new("Luffy").with_price("30")];
        let mut renderer = HtmlRenderer::new();

        renderer.render(&view_of(&items, ""));
        renderer.render(&view_of(&items, "luffy"));

        assert_eq!(renderer.results_html().matches("class=\"card\"").count(), 1);
        assert!(!renderer.results_html().contains("Goku"));
    }

    #[test]
    fn test_html_escapes_text() {
        let items = vec![CatalogItem::new("<b>Bad & \"Bold\"</b>")];
        let mut renderer = HtmlRenderer::new();
        renderer.render(&view_of(&items, ""));

        assert!(renderer
            .results_html()
            .contains("&lt;b&gt;Bad &amp; &quot;Bold&quot;&lt;/b&gt;"));
    }

    #[test]
    fn test_page_fills_template() {
        let items = vec![goku()];
        let mut renderer = HtmlRenderer::new();
        renderer.render(&view_of(&items, "dbz"));

        let page = renderer.page();
        assert!(page.contains("id=\"total-price\">50.00<"));
        assert!(page.contains("id=\"search-sale\">40.00<"));
        assert!(page.contains("value=\"dbz\""));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_page_keeps_placeholder_like_query_verbatim() {
        let items = vec![goku()];
        let mut renderer = HtmlRenderer::new();
        renderer.render(&view_of(&items, "{{results}}"));

        let page = renderer.page();
        assert!(page.contains("value=\"{{results}}\""));
        assert!(page.contains("<div id=\"results\"><p>No results found.</p></div>"));
    }

    #[test]
    fn test_page_drops_stale_search_responses() {
        let page = HtmlRenderer::new().page();
        assert!(page.contains("const request = ++latestRequest;"));
        assert_eq!(page.matches("if (request !== latestRequest").count(), 2);
    }

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template("a={{a}} b={{b}} c={{c}} {{open", |name| match name {
            "a" => Some("{{b}}"),
            "b" => Some("2"),
            _ => None,
        });
        assert_eq!(filled, "a={{b}} b=2 c={{c}} {{open");
    }

    #[test]
    fn test_text_renderer_lines() {
        let items = vec![goku(), CatalogItem::new("Luffy").with_series("One Piece").with_price("30")];
        let mut renderer = TextRenderer::new();
        renderer.render(&view_of(&items, "one"));

        let lines = renderer.lines();
        assert_eq!(lines[0], "Luffy | One Piece |  | $30.00");
        assert!(lines.contains(&"Collection: 80.00 (sale 70.00)".to_string()));
        assert!(lines.contains(&"Search \"one\": 1 items, 30.00 (sale 30.00)".to_string()));
    }

    #[test]
    fn test_text_renderer_no_results() {
        let items = vec![goku()];
        let mut renderer = TextRenderer::new();
        renderer.render(&view_of(&items, "zzz"));
        assert_eq!(renderer.lines()[0], NO_RESULTS);
    }
}
