//! Ajio product-page adapter.
//!
//! Ajio pages carry no usable structured data; every field comes from
//! DOM selector chains.

use pricewatch_core::ProductSnapshot;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::HttpClient;
use crate::dom;
use crate::error::ScrapeError;
use crate::normalize::{ensure_https, truncate_title};

const TITLE_SELECTORS: [&str; 5] = [
    ".product-title",
    ".item-title h1",
    ".ajio-product-name",
    r#"h1[data-automation-id="productTitle"]"#,
    ".prod-title h1",
];

const PRICE_SELECTORS: [&str; 5] = [
    ".price-current",
    ".final-price .amount",
    ".price-display",
    r#"[data-automation-id="productPrice"]"#,
    ".prod-sp",
];

const IMAGE_SELECTORS: [&str; 5] = [
    ".rilrtl-lazy-img",
    ".product-image img",
    ".img-responsive",
    r#"[data-automation-id="productImage"]"#,
    ".prod-img img",
];

const RATING_SELECTORS: [&str; 3] = [
    ".rating-value",
    ".prod-rating .rating",
    r#"[data-automation-id="rating"]"#,
];

const RATING_COUNT_SELECTORS: [&str; 3] = [
    ".rating-count",
    ".prod-rating .count",
    r#"[data-automation-id="ratingCount"]"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page(url).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "ajio served a challenge page");
        return Err(ScrapeError::Blocked {
            url: page.final_url,
        });
    }
    extract(&page.body).ok_or_else(|| ScrapeError::MissingTitle {
        url: url.to_string(),
    })
}

pub(crate) fn extract(html: &str) -> Option<ProductSnapshot> {
    let doc = Html::parse_document(html);

    let title = dom::first_text(&doc, &TITLE_SELECTORS).map(|t| truncate_title(&t))?;
    let price = dom::first_price(&doc, &PRICE_SELECTORS);
    let image = dom::first_image(&doc, &IMAGE_SELECTORS).map(|u| ensure_https(&u));
    let rating = dom::first_rating(&doc, &RATING_SELECTORS);
    let rating_count = dom::first_count(&doc, &RATING_COUNT_SELECTORS);

    Some(ProductSnapshot {
        title,
        price,
        image,
        rating,
        rating_count,
    })
}
