//! Croma product-page adapter.
//!
//! Croma sits behind bot-challenge middleware, so the fetch goes through
//! the fingerprint-evading transport first. The page is a hydrated SPA:
//! after JSON-LD and meta tags, the price hunt walks every embedded JSON
//! blob with the croma key priority before touching DOM selectors, and a
//! raw key/value regex is the last chance.

use pricewatch_core::ProductSnapshot;
use regex::Regex;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::{HttpClient, DESKTOP_UA};
use crate::dom;
use crate::error::ScrapeError;
use crate::jsonld;
use crate::normalize::{absolutize, to_float, truncate_title};
use crate::structured::{find_first_image, find_first_numeric, harvest_json_blobs, PRICE_KEY_PRIORITY};

const TITLE_META_SELECTORS: [&str; 2] = [
    r#"meta[property="og:title"]"#,
    r#"meta[name="twitter:title"]"#,
];

const TITLE_SELECTORS: [&str; 6] = [
    "h1.pdp-product-name",
    "h1.pdp-title",
    ".product-title h1",
    r#"h1[data-testid="productName"]"#,
    "h1.product-name",
    "h1",
];

const PRICE_META_SELECTORS: [&str; 4] = [
    r#"meta[itemprop="price"]"#,
    r#"meta[property="product:price:amount"]"#,
    r#"meta[property="og:price:amount"]"#,
    r#"meta[name="twitter:data1"]"#,
];

const PRICE_SELECTORS: [&str; 10] = [
    ".pdp-price .amount",
    ".product-price .final-price",
    ".product-price .amount",
    ".price-final",
    ".new-price",
    ".selling-price",
    ".current-price",
    ".cp-price__current",
    ".pdp__price",
    ".pdp-price",
];

const IMAGE_META_SELECTORS: [&str; 2] = [
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
];

const IMAGE_SELECTORS: [&str; 9] = [
    r#"img[itemprop="image"]"#,
    ".pdp-image img",
    ".product-image img",
    ".main-image img",
    ".gallery-image img",
    ".product-gallery img",
    ".pdp__image img",
    ".swiper-slide img",
    "picture source",
];

const RATING_SELECTORS: [&str; 4] = [
    ".rating-value",
    ".star-rating .rating",
    r#"[itemprop="ratingValue"]"#,
    ".reviews-rating",
];

const RATING_COUNT_SELECTORS: [&str; 4] = [
    ".rating-count",
    ".reviews-count",
    ".total-reviews",
    r#"[itemprop="reviewCount"]"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page_evasive(url, DESKTOP_UA).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "croma served an anti-bot or JS wall");
        return Err(ScrapeError::Blocked {
            url: page.final_url,
        });
    }
    extract(&page.body, url).ok_or_else(|| ScrapeError::MissingTitle {
        url: url.to_string(),
    })
}

pub(crate) fn extract(html: &str, page_url: &str) -> Option<ProductSnapshot> {
    let doc = Html::parse_document(html);
    let blobs = harvest_json_blobs(html);
    let product = jsonld::find_product_node(&blobs);

    let title = product
        .and_then(jsonld::product_name)
        .or_else(|| dom::first_text(&doc, &TITLE_META_SELECTORS))
        .or_else(|| dom::first_text(&doc, &TITLE_SELECTORS))
        .map(|t| truncate_title(&t))?;

    let mut price = product.and_then(jsonld::product_price);
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_META_SELECTORS);
    }
    if price.is_none() {
        price = blobs
            .iter()
            .find_map(|blob| find_first_numeric(blob, &PRICE_KEY_PRIORITY));
    }
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_SELECTORS);
    }
    if price.is_none() {
        price = raw_price_key_scan(html);
    }

    let mut image = product
        .and_then(jsonld::product_image)
        .and_then(|u| absolutize(page_url, &u));
    if image.is_none() {
        image = dom::first_text(&doc, &IMAGE_META_SELECTORS)
            .or_else(|| dom::first_attr(&doc, &[r#"link[rel="image_src"]"#], "href"))
            .and_then(|u| absolutize(page_url, &u));
    }
    if image.is_none() {
        image = dom::first_image(&doc, &IMAGE_SELECTORS).and_then(|u| absolutize(page_url, &u));
    }
    if image.is_none() {
        image = blobs
            .iter()
            .find_map(find_first_image)
            .and_then(|u| absolutize(page_url, &u));
    }

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

/// Last chance: any price-ish key/value pair in the raw HTML. First match
/// wins even when it is a struck-through or unrelated price.
fn raw_price_key_scan(html: &str) -> Option<f64> {
    let re = Regex::new(
        r#"(?i)"(?:finalPrice|youPay|offerPrice|sellingPrice|currentPrice|price|displayPrice|totalPayable|amount)"\s*:\s*"?([\d,.]+)"?"#,
    )
    .expect("valid regex");
    let cap = re.captures(html)?;
    to_float(&cap[1]).filter(|p| *p > 0.0)
}
