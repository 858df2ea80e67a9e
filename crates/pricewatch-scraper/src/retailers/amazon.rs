//! Amazon product-page adapter.
//!
//! Amazon serves fully rendered markup but rotates price containers
//! frequently and hides the best image candidates in a
//! `data-a-dynamic-image` JSON attribute. Challenged sessions are
//! redirected to a Robot Check page caught by the classifier.

use pricewatch_core::ProductSnapshot;
use scraper::{ElementRef, Html};

use crate::block::is_blocked;
use crate::client::HttpClient;
use crate::dom;
use crate::error::ScrapeError;
use crate::normalize::{
    ensure_https, pick_from_srcset, pick_largest_dynamic_image, truncate_title,
    upgrade_amazon_image,
};

const TITLE_SELECTORS: [&str; 6] = [
    "#productTitle",
    "h1#title",
    ".product-title",
    "h1.a-size-large",
    r#"[data-automation-id="product-title"]"#,
    r#"meta[property="og:title"]"#,
];

const PRICE_SELECTORS: [&str; 7] = [
    ".a-price .a-offscreen",
    "#priceblock_dealprice",
    "#priceblock_ourprice",
    "#corePrice_feature_div .a-offscreen",
    ".a-price .a-price-range .a-price-whole",
    ".a-price-current .a-offscreen",
    r#"meta[property="og:price:amount"]"#,
];

const LANDING_IMAGE_SELECTORS: [&str; 3] =
    ["#landingImage", "#imgTagWrapperId img", ".a-dynamic-image"];

const IMAGE_BLOCK_SELECTORS: [&str; 3] = [
    "#imageBlock_feature_div img",
    "#ebooksImageBlockContainer img",
    "#imageBlock img",
];

const RATING_SELECTORS: [&str; 4] = [
    r#"i[data-hook="average-star-rating"] .a-icon-alt"#,
    ".a-icon-star .a-icon-alt",
    "#acrPopover .a-icon-alt",
    ".cr-widget-AverageCustomerReviews .a-icon-alt",
];

const RATING_COUNT_SELECTORS: [&str; 3] = [
    "#acrCustomerReviewText",
    r#"[data-hook="total-review-count"]"#,
    ".a-link-normal .a-size-base",
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let page = client.fetch_page(url).await?;
    if is_blocked(&page.body, &page.final_url) {
        tracing::warn!(url, "amazon served a robot-check page");
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

    let landing = dom::first_element(&doc, &LANDING_IMAGE_SELECTORS);
    let mut image = landing
        .and_then(|el| el.value().attr("data-a-dynamic-image"))
        .and_then(pick_largest_dynamic_image);
    if image.is_none() {
        image = landing
            .and_then(|el| el.value().attr("srcset"))
            .and_then(pick_from_srcset);
    }
    if image.is_none() {
        image = landing.and_then(direct_image_attr);
    }
    if image.is_none() {
        image = dom::first_text(&doc, &[r#"meta[property="og:image"]"#]);
    }
    if image.is_none() {
        image = dom::first_element(&doc, &IMAGE_BLOCK_SELECTORS).and_then(direct_image_attr);
    }
    let image = image.map(|u| upgrade_amazon_image(&ensure_https(&u)));

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

/// Amazon image elements carry the full-size URL in `data-old-hires`
/// before the lazy-loading attributes.
fn direct_image_attr(el: ElementRef<'_>) -> Option<String> {
    ["data-old-hires", "data-src", "src"]
        .iter()
        .find_map(|attr| el.value().attr(attr))
        .map(str::to_string)
}
