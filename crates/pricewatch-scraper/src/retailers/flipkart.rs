//! Flipkart product-page adapter.
//!
//! Class names rotate often (obfuscated CSS), so the price chain leans on
//! JSON-LD and meta tags before the known class list, with a whole-page
//! rupee scan as the last resort. Rating is not exposed in the served
//! markup and stays `None`.

use pricewatch_core::ProductSnapshot;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::HttpClient;
use crate::dom;
use crate::error::ScrapeError;
use crate::jsonld;
use crate::normalize::{ensure_https, parse_price, truncate_title};
use crate::structured::harvest_json_blobs;

const TITLE_SELECTORS: [&str; 4] = [
    "span.B_NuCI",
    "h1.YoV1Gd",
    r#"meta[property="og:title"]"#,
    r#"meta[name="twitter:title"]"#,
];

const PRICE_META_SELECTORS: [&str; 3] = [
    r#"meta[property="product:price:amount"]"#,
    r#"meta[itemprop="price"]"#,
    r#"meta[name="twitter:data1"]"#,
];

const PRICE_SELECTORS: [&str; 11] = [
    "div._30jeq3._16Jk6d",
    "div._30jeq3",
    "span._30jeq3._16Jk6d",
    "span._30jeq3",
    "div.Nx9bqj",
    "span.Nx9bqj",
    "div.CxhGGd",
    "span.CxhGGd",
    "div.CEmiEU .Nx9bqj",
    "div.CEmiEU .CxhGGd",
    "div._25b18c ._30jeq3",
];

const IMAGE_SELECTORS: [&str; 3] = ["img._2r_T1I", "img._396cs4", "img.CXW8mj"];

const IMAGE_META_SELECTORS: [&str; 2] = [
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page(url).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "flipkart served a challenge page");
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

    let blobs = harvest_json_blobs(html);
    let mut price = jsonld::find_typed_node(&blobs, &["Product", "Offer", "AggregateOffer"])
        .and_then(jsonld::product_price);
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_META_SELECTORS);
    }
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_SELECTORS);
    }
    if price.is_none() {
        // Last resort: the first rupee-prefixed number anywhere on the page.
        let page_text: String = doc.root_element().text().collect();
        price = parse_price(&page_text);
    }

    let image = dom::first_image(&doc, &IMAGE_SELECTORS)
        .or_else(|| dom::first_text(&doc, &IMAGE_META_SELECTORS))
        .map(|u| ensure_https(&u));

    Some(ProductSnapshot {
        title,
        price,
        image,
        rating: None,
        rating_count: None,
    })
}
