use serde::{Deserialize, Serialize};
use thiserror::Error;

mod app_config;
mod config;

pub use app_config::{AppConfig, FetchConfig};
pub use config::{load_app_config, load_app_config_from_env};

/// Image URL substituted when an extraction yields no usable product image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/240x240?text=No+Image";

/// Retail platform a product URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Amazon,
    Flipkart,
    Myntra,
    Meesho,
    Ajio,
    Croma,
    Nykaa,
    Unknown,
}

impl Platform {
    /// Display label as persisted by the tracked-product store.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::Myntra => "Myntra",
            Platform::Meesho => "Meesho",
            Platform::Ajio => "Ajio",
            Platform::Croma => "Croma",
            Platform::Nykaa => "Nykaa",
            Platform::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized record extracted from one product page by one adapter
/// invocation.
///
/// `title` is always present and truncated to 200 characters — an adapter
/// that cannot resolve a title reports failure instead of returning a
/// partial snapshot. Every other field is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub title: String,
    /// Current price in the page's currency. `None` when no strategy
    /// yielded a parseable numeric value.
    pub price: Option<f64>,
    /// Absolute HTTPS URL of the best-resolution product image found.
    pub image: Option<String>,
    /// Typically a 0–5 scale; permanently `None` for retailers that do not
    /// expose it in available markup.
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
}

/// Always-well-formed result handed to callers of the router.
///
/// Extraction failures are folded into placeholder values here so a single
/// bad product never aborts a batch of checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    /// `0.0` when the price could not be extracted.
    pub price: f64,
    /// Original retailer CDN URL, or [`PLACEHOLDER_IMAGE`]. Proxying for
    /// hotlink restrictions is the caller's responsibility.
    pub image_url: String,
    pub platform: Platform,
}

/// Whether a freshly fetched price has reached the user's target.
///
/// The alerting collaborator is invoked by the caller when this returns
/// `true`; an unknown price never triggers an alert.
#[must_use]
pub fn price_target_reached(current: Option<f64>, target: f64) -> bool {
    match current {
        Some(price) => target > 0.0 && price > 0.0 && price <= target,
        None => false,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
