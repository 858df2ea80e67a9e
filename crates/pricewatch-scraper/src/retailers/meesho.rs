//! Meesho product-page adapter.
//!
//! Meesho runs aggressive bot-challenge middleware. The fetch chain walks
//! five transports — evasive desktop, evasive mobile, plain desktop,
//! plain mobile, and finally the read-only rendering-proxy mirror — and
//! uses the first body that is not a challenge page.

use pricewatch_core::ProductSnapshot;
use scraper::Html;

use crate::block::is_blocked;
use crate::client::{HttpClient, DESKTOP_UA, MOBILE_UA};
use crate::dom;
use crate::error::ScrapeError;
use crate::jsonld;
use crate::normalize::{ensure_https, parse_price, truncate_title};
use crate::structured::harvest_json_blobs;

const TITLE_META_SELECTORS: [&str; 2] = [
    r#"meta[property="og:title"]"#,
    r#"meta[name="twitter:title"]"#,
];

const IMAGE_META_SELECTORS: [&str; 3] = [
    r#"meta[property="og:image:secure_url"]"#,
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
];

const PRICE_SELECTORS: [&str; 3] = [
    r#"[class*="price"]"#,
    r#"[id*="price"]"#,
    r#"[data-testid*="price"]"#,
];

const CDN_IMAGE_SELECTORS: [&str; 2] = [
    r#"img[src*='images.meesho.com']"#,
    r#"img[src*='cdn.meesho.com']"#,
];

pub(crate) async fn fetch_details(
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    let body = fetch_with_fallbacks(client, url).await?;
    extract(&body).ok_or_else(|| ScrapeError::MissingTitle {
        url: url.to_string(),
    })
}

/// Walks the transport chain until one attempt returns a non-challenge
/// body. Reports `Blocked` when every reachable body was a challenge
/// page, `AllAttemptsFailed` when nothing was reachable at all.
async fn fetch_with_fallbacks(client: &HttpClient, url: &str) -> Result<String, ScrapeError> {
    let mut saw_challenge = false;
    let mut consider = |attempt: Result<crate::client::FetchedPage, ScrapeError>,
                        transport: &str|
     -> Option<String> {
        match attempt {
            Ok(page) if !is_blocked(&page.body, &page.final_url) => Some(page.body),
            Ok(_) => {
                tracing::debug!(url, transport, "challenge page, trying next transport");
                saw_challenge = true;
                None
            }
            Err(err) => {
                tracing::debug!(url, transport, error = %err, "fetch failed");
                None
            }
        }
    };

    let attempt = client.fetch_page_evasive(url, DESKTOP_UA).await;
    if let Some(body) = consider(attempt, "evasive-desktop") {
        return Ok(body);
    }
    let attempt = client.fetch_page_evasive(url, MOBILE_UA).await;
    if let Some(body) = consider(attempt, "evasive-mobile") {
        return Ok(body);
    }
    let attempt = client.fetch_page(url).await;
    if let Some(body) = consider(attempt, "plain-desktop") {
        return Ok(body);
    }
    let attempt = client.fetch_page_with_user_agent(url, MOBILE_UA).await;
    if let Some(body) = consider(attempt, "plain-mobile") {
        return Ok(body);
    }

    if client.mirror_enabled() {
        if let Ok(page) = client.fetch_mirror(url).await {
            return Ok(page.body);
        }
    }

    if saw_challenge {
        Err(ScrapeError::Blocked {
            url: url.to_string(),
        })
    } else {
        Err(ScrapeError::AllAttemptsFailed {
            url: url.to_string(),
        })
    }
}

pub(crate) fn extract(html: &str) -> Option<ProductSnapshot> {
    let doc = Html::parse_document(html);
    let blobs = harvest_json_blobs(html);
    // Meesho tags some pages WebPage rather than Product; both carry
    // usable name/image fields.
    let node = jsonld::find_typed_node(&blobs, &["Product", "WebPage"]);

    let title = node
        .and_then(jsonld::product_name)
        .or_else(|| dom::first_text(&doc, &TITLE_META_SELECTORS))
        .map(|t| truncate_title(&t))?;

    let mut price = node.and_then(jsonld::product_price);
    if price.is_none() {
        price = dom::first_price(&doc, &[r#"meta[property="product:price:amount"]"#]);
    }
    if price.is_none() {
        price = dom::first_price(&doc, &PRICE_SELECTORS);
    }
    if price.is_none() {
        let page_text: String = doc.root_element().text().collect();
        price = parse_price(&page_text);
    }

    let mut image = node.and_then(jsonld::product_image);
    if image.is_none() {
        image = dom::first_text(&doc, &IMAGE_META_SELECTORS);
    }
    if image.is_none() {
        image = dom::first_attr(&doc, &[r#"link[rel="preload"][as="image"]"#], "href");
    }
    if image.is_none() {
        image = dom::first_image(&doc, &["main picture img"]);
    }
    if image.is_none() {
        image = dom::first_image(&doc, &CDN_IMAGE_SELECTORS);
    }
    let image = image.map(|u| ensure_https(&u));

    Some(ProductSnapshot {
        title,
        price,
        image,
        rating: None,
        rating_count: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonld_webpage_node_supplies_title_and_image() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {"@type":"WebPage","name":"Printed Cotton Kurti","image":"https://images.meesho.com/kurti.jpg"}
            </script>
            <meta property="product:price:amount" content="349">
            </head><body></body></html>
        "#;
        let snapshot = extract(html).expect("snapshot");
        assert_eq!(snapshot.title, "Printed Cotton Kurti");
        assert_eq!(snapshot.price, Some(349.0));
        assert_eq!(
            snapshot.image.as_deref(),
            Some("https://images.meesho.com/kurti.jpg")
        );
    }

    #[test]
    fn meta_and_preload_fallbacks() {
        let html = r#"
            <html><head>
            <meta property="og:title" content="Kitchen Storage Set">
            <link rel="preload" as="image" href="//cdn.meesho.com/storage.webp">
            </head><body><span class="final-price">₹259</span></body></html>
        "#;
        let snapshot = extract(html).expect("snapshot");
        assert_eq!(snapshot.title, "Kitchen Storage Set");
        assert_eq!(snapshot.price, Some(259.0));
        assert_eq!(
            snapshot.image.as_deref(),
            Some("https://cdn.meesho.com/storage.webp")
        );
    }

    #[test]
    fn whole_page_rupee_scan_recovers_price() {
        let html = r#"
            <html><head><meta property="og:title" content="Slippers"></head>
            <body><div>Only ₹199 with free delivery</div></body></html>
        "#;
        let snapshot = extract(html).expect("snapshot");
        assert_eq!(snapshot.price, Some(199.0));
    }

    #[test]
    fn rating_is_permanently_absent() {
        let html = r#"<html><head><meta property="og:title" content="Slippers"></head><body></body></html>"#;
        let snapshot = extract(html).expect("snapshot");
        assert_eq!(snapshot.rating, None);
        assert_eq!(snapshot.rating_count, None);
    }

    #[test]
    fn missing_title_is_failure() {
        assert!(extract("<html><body>₹99</body></html>").is_none());
    }
}
