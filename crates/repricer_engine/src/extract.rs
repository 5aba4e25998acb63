use repricer_core::ScrapedListing;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// CSS markers of the listing page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSchema {
    pub price_container: String,
    pub quantity_container: String,
    /// Text span looked up inside either container.
    pub text_span: String,
}

impl Default for PageSchema {
    fn default() -> Self {
        Self {
            price_container: "div.x-price-primary".to_string(),
            quantity_container: "div.x-quantity__availability".to_string(),
            text_span: "span.ux-textspans".to_string(),
        }
    }
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> ScrapedListing;
}

/// Pulls price and stock out of a listing page:
/// - price: first text span inside the primary price container
/// - quantity: first text span inside the availability container, or the
///   container's own text when it has no span
///
/// Missing containers fall back to the sentinels of [`ScrapedListing::from_raw`].
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    price_container: Selector,
    quantity_container: Selector,
    text_span: Selector,
}

impl ListingExtractor {
    pub fn new(schema: &PageSchema) -> Result<Self, ExtractError> {
        Ok(Self {
            price_container: compile(&schema.price_container)?,
            quantity_container: compile(&schema.quantity_container)?,
            text_span: compile(&schema.text_span)?,
        })
    }

    fn span_text(&self, container: ElementRef<'_>) -> Option<String> {
        container
            .select(&self.text_span)
            .next()
            .map(collect_text)
    }
}

impl Extractor for ListingExtractor {
    fn extract(&self, html: &str) -> ScrapedListing {
        let doc = Html::parse_document(html);

        let raw_price = doc
            .select(&self.price_container)
            .next()
            .and_then(|container| self.span_text(container));

        let raw_quantity = doc
            .select(&self.quantity_container)
            .next()
            .map(|container| {
                self.span_text(container)
                    .unwrap_or_else(|| collect_text(container))
            });

        ScrapedListing::from_raw(raw_price.as_deref(), raw_quantity.as_deref())
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::Selector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
