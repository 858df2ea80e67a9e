//! Nykaa product-page adapter. DOM selector chains only.

use pricewatch_core::ProductSnapshot;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::HttpClient;
use crate::dom;
use crate::error::ScrapeError;
use crate::normalize::{ensure_https, truncate_title};

const TITLE_SELECTORS: [&str; 4] = [
    "h1.product-title",
    ".product-name h1",
    ".pdp-product-name",
    r#"h1[data-testid="pdpProductName"]"#,
];

const PRICE_SELECTORS: [&str; 4] = [
    ".final-price",
    ".product-price-final",
    ".price-final .amount",
    r#"[data-testid="pdpPrice"]"#,
];

const IMAGE_SELECTORS: [&str; 4] = [
    ".product-image-main img",
    ".product-gallery img",
    ".pdp-image img",
    r#"[data-testid="pdpImage"]"#,
];

const RATING_SELECTORS: [&str; 3] = [
    ".rating-value",
    ".product-rating .rating",
    r#"[data-testid="pdpRating"]"#,
];

const RATING_COUNT_SELECTORS: [&str; 3] = [
    ".rating-count",
    ".reviews-count",
    r#"[data-testid="pdpReviewCount"]"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page(url).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "nykaa served a challenge page");
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
