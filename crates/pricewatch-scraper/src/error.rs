use thiserror::Error;

/// Failure modes of one extraction invocation.
///
/// All variants are recoverable at the router boundary: `fetch_product`
/// converts them into placeholder records instead of propagating them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("all fetch attempts failed for {url}")]
    AllAttemptsFailed { url: String },

    #[error("bot challenge detected at {url}")]
    Blocked { url: String },

    #[error("no product title resolved at {url}")]
    MissingTitle { url: String },

    #[error("no retailer adapter matches {url}")]
    UnknownPlatform { url: String },
}
