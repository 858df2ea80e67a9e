//! Myntra product-page adapter.
//!
//! JSON-LD Product blocks are the reliable source here; DOM class names
//! change often enough that the selector lists are only a fallback, with
//! a raw price-key regex as the final step.

use pricewatch_core::ProductSnapshot;
use regex::Regex;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::HttpClient;
use crate::dom;
use crate::error::ScrapeError;
use crate::jsonld;
use crate::normalize::{ensure_https, to_float, truncate_title};
use crate::structured::harvest_json_blobs;

const TITLE_SELECTORS: [&str; 8] = [
    "h1.pdp-title",
    "h1.pdp-name",
    ".pdp-product-name",
    r#"h1[data-testid="name"]"#,
    ".product-base-title h1",
    ".pdp-e-product-title",
    ".product-title",
    "h1",
];

const PRICE_META_SELECTORS: [&str; 2] = [
    r#"meta[itemprop="price"]"#,
    r#"meta[property="product:price:amount"]"#,
];

const PRICE_SELECTORS: [&str; 9] = [
    "span.pdp-price > strong",
    "div.pdp-price > strong",
    "span.pdp-discounted-price",
    "div.pdp-price-info span",
    ".product-discountedPrice",
    ".product-discountPrice",
    ".pdp-offers-price",
    ".price-current",
    ".pdp-price",
];

const IMAGE_SELECTORS: [&str; 5] = [
    ".pdp-product-img img",
    ".image-grid img",
    ".product-image img",
    ".product-sliderImage img",
    ".product-base-imgContainer img",
];

const RATING_SELECTORS: [&str; 3] = [
    ".index-overallRating",
    r#"[data-testid="rating"]"#,
    ".ratings-rating",
];

const RATING_COUNT_SELECTORS: [&str; 3] = [
    ".index-ratingsCount",
    ".ratings-count",
    r#"[data-testid="ratingsCount"]"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page(url).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "myntra served a challenge page");
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
    let blobs = harvest_json_blobs(html);
    let product = jsonld::find_product_node(&blobs);

    let title = product
        .and_then(jsonld::product_name)
        .or_else(|| dom::first_text(&doc, &TITLE_SELECTORS))
        .map(|t| truncate_title(&t))?;

    let mut price = product.and_then(jsonld::product_price);
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_META_SELECTORS);
    }
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_SELECTORS);
    }
    if price.is_none() {
        price = raw_price_key_scan(html);
    }

    let image = product
        .and_then(jsonld::product_image)
        .or_else(|| dom::first_image(&doc, &IMAGE_SELECTORS))
        .map(|u| ensure_https(&u));

    let rating = product
        .and_then(jsonld::product_rating)
        .or_else(|| dom::first_rating(&doc, &RATING_SELECTORS));
    let rating_count = product
        .and_then(jsonld::product_rating_count)
        .or_else(|| dom::first_count(&doc, &RATING_COUNT_SELECTORS));

    Some(ProductSnapshot {
        title,
        price,
        image,
        rating,
        rating_count,
    })
}

/// Final fallback: sniff any price-ish key/value pair in the raw HTML.
fn raw_price_key_scan(html: &str) -> Option<f64> {
    let re = Regex::new(r#"(?i)"(?:offerPrice|discountedPrice|price)"\s*:\s*"?([\d,.]+)"?"#)
        .expect("valid regex");
    let cap = re.captures(html)?;
    to_float(&cap[1]).filter(|p| *p > 0.0)
}
