//! Retailer routing and the fault-isolating extraction boundary.
//!
//! [`fetch_product`] never fails: unknown URLs become a manual-entry
//! placeholder, and any adapter-internal failure becomes a uniform
//! "failed to fetch" record, so a single bad product cannot abort a
//! batch of checks.

use pricewatch_core::{Platform, ProductRecord, ProductSnapshot, PLACEHOLDER_IMAGE};

use crate::client::HttpClient;
use crate::error::ScrapeError;
use crate::retailers;

/// URL keyword table; first substring match wins.
const PLATFORM_KEYWORDS: [(&str, Platform); 7] = [
    ("amazon", Platform::Amazon),
    ("flipkart", Platform::Flipkart),
    ("myntra", Platform::Myntra),
    ("meesho.com", Platform::Meesho),
    ("ajio", Platform::Ajio),
    ("croma", Platform::Croma),
    ("nykaa", Platform::Nykaa),
];

/// Maps a product URL to its retailer by case-insensitive substring match.
#[must_use]
pub fn detect_platform(url: &str) -> Option<Platform> {
    let lowered = url.to_lowercase();
    PLATFORM_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, platform)| *platform)
}

/// Runs one platform's adapter against a URL.
///
/// Exposed separately from [`fetch_snapshot`] so callers (and tests) can
/// drive an adapter against an arbitrary host.
///
/// # Errors
///
/// Any [`ScrapeError`] the adapter reports; [`ScrapeError::UnknownPlatform`]
/// for [`Platform::Unknown`].
pub async fn dispatch(
    platform: Platform,
    client: &HttpClient,
    url: &str,
) -> Result<ProductSnapshot, ScrapeError> {
    match platform {
        Platform::Amazon => retailers::amazon::fetch_details(client, url).await,
        Platform::Flipkart => retailers::flipkart::fetch_details(client, url).await,
        Platform::Myntra => retailers::myntra::fetch_details(client, url).await,
        Platform::Meesho => retailers::meesho::fetch_details(client, url).await,
        Platform::Ajio => retailers::ajio::fetch_details(client, url).await,
        Platform::Croma => retailers::croma::fetch_details(client, url).await,
        Platform::Nykaa => retailers::nykaa::fetch_details(client, url).await,
        Platform::Unknown => Err(ScrapeError::UnknownPlatform {
            url: url.to_string(),
        }),
    }
}

/// Routes a URL to its adapter and returns the typed result.
///
/// # Errors
///
/// [`ScrapeError::UnknownPlatform`] when no keyword matches; otherwise
/// whatever the adapter reports.
pub async fn fetch_snapshot(
    client: &HttpClient,
    url: &str,
) -> Result<(Platform, ProductSnapshot), ScrapeError> {
    let platform = detect_platform(url).ok_or_else(|| ScrapeError::UnknownPlatform {
        url: url.to_string(),
    })?;
    let snapshot = dispatch(platform, client, url).await?;
    Ok((platform, snapshot))
}

/// Extraction with the failure modes folded into placeholder records.
pub async fn fetch_product(client: &HttpClient, url: &str) -> ProductRecord {
    match fetch_snapshot(client, url).await {
        Ok((platform, snapshot)) => ProductRecord {
            title: snapshot.title,
            price: snapshot.price.unwrap_or(0.0),
            image_url: snapshot.image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            platform,
        },
        Err(ScrapeError::UnknownPlatform { url }) => {
            tracing::warn!(url, "no adapter matches; recording manual entry");
            ProductRecord {
                title: "Manual Entry".to_string(),
                price: 0.0,
                image_url: PLACEHOLDER_IMAGE.to_string(),
                platform: Platform::Unknown,
            }
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "extraction failed; recording placeholder");
            ProductRecord {
                title: "Product (Failed to fetch details)".to_string(),
                price: 0.0,
                image_url: PLACEHOLDER_IMAGE.to_string(),
                platform: Platform::Unknown,
            }
        }
    }
}
