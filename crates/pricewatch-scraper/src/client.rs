//! HTTP transport for retailer product pages.
//!
//! One client instance is shared across adapter calls but holds no
//! per-request state; every extraction invocation owns its request chain.
//! A jittered politeness pause precedes each request — a deliberate
//! serialization point, not a performance knob.

use std::time::Duration;

use pricewatch_core::FetchConfig;
use rand::Rng;

use crate::error::ScrapeError;

pub(crate) const DESKTOP_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

pub(crate) const MOBILE_UA: &str =
    "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/127.0.0.0 Mobile Safari/537.36";

/// Hard cap on curl-fetched bodies; product pages past this size are not
/// real product pages.
const CURL_MAX_BODY_BYTES: u64 = 10_485_760;

/// One fetched page: decoded body, post-redirect URL, and status.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub final_url: String,
    pub status: u16,
}

/// Transport client with retailer-appropriate headers and fallbacks.
///
/// The plain path goes through `reqwest` (rustls, gzip/deflate decoding —
/// brotli is never advertised). The evasive path shells out to `curl`,
/// whose TLS fingerprint passes bot-challenge middleware that rejects
/// stock HTTP clients; a missing or failing curl silently falls back to
/// the plain path.
pub struct HttpClient {
    inner: reqwest::Client,
    timeout_secs: u64,
    delay_min_ms: u64,
    delay_max_ms: u64,
    mirror_fallback: bool,
}

impl HttpClient {
    /// Builds a client from transport config.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            inner,
            timeout_secs: config.timeout_secs,
            delay_min_ms: config.delay_min_ms,
            delay_max_ms: config.delay_max_ms,
            mirror_fallback: config.mirror_fallback,
        })
    }

    pub(crate) fn mirror_enabled(&self) -> bool {
        self.mirror_fallback
    }

    /// Fetches a page with the desktop user-agent.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Status`] on non-2xx, [`ScrapeError::Http`] on
    /// network/timeout failure. No retry at this layer.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        self.politeness_pause().await;
        self.request(url, DESKTOP_UA).await
    }

    /// Fetches a page with an explicit user-agent (mobile fallback chains).
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_page`].
    pub async fn fetch_page_with_user_agent(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<FetchedPage, ScrapeError> {
        self.politeness_pause().await;
        self.request(url, user_agent).await
    }

    /// Fetches through the fingerprint-evading variant first, then the
    /// plain client.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_page`]; curl failures are soft and never
    /// surface.
    pub async fn fetch_page_evasive(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<FetchedPage, ScrapeError> {
        self.politeness_pause().await;
        if let Some(body) = self.curl_fetch(url, user_agent).await {
            return Ok(FetchedPage {
                body,
                final_url: url.to_string(),
                status: 200,
            });
        }
        self.request(url, user_agent).await
    }

    /// Fetches the read-only rendering-proxy mirror of a hard-blocked page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_page`].
    pub async fn fetch_mirror(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        self.politeness_pause().await;
        self.request(&mirror_url(url), DESKTOP_UA).await
    }

    async fn request(&self, url: &str, user_agent: &str) -> Result<FetchedPage, ScrapeError> {
        let response = self
            .inner
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
            .header(reqwest::header::REFERER, referer_for_host(url))
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header("DNT", "1")
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: final_url,
            });
        }
        let body = response.text().await?;
        Ok(FetchedPage {
            body,
            final_url,
            status: status.as_u16(),
        })
    }

    /// Browser-fingerprinted fetch via the system curl. `None` on any
    /// failure: missing binary, non-2xx (`-f`), or an empty body.
    async fn curl_fetch(&self, url: &str, user_agent: &str) -> Option<String> {
        let output = tokio::process::Command::new("curl")
            .arg("-Lsf")
            .arg("--proto")
            .arg("=https,http")
            .arg("--max-filesize")
            .arg(CURL_MAX_BODY_BYTES.to_string())
            .arg("--max-time")
            .arg(self.timeout_secs.to_string())
            .arg("--user-agent")
            .arg(user_agent)
            .arg("-H")
            .arg(format!("Referer: {}", referer_for_host(url)))
            .arg("-H")
            .arg("Accept-Language: en-IN,en;q=0.9")
            .arg(url)
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            tracing::debug!(url, code = ?output.status.code(), "curl fetch failed");
            return None;
        }
        let body = String::from_utf8_lossy(&output.stdout).to_string();
        if body.trim().is_empty() {
            return None;
        }
        Some(body)
    }

    async fn politeness_pause(&self) {
        if self.delay_max_ms == 0 {
            return;
        }
        let ms = if self.delay_min_ms >= self.delay_max_ms {
            self.delay_max_ms
        } else {
            rand::rng().random_range(self.delay_min_ms..=self.delay_max_ms)
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Referer header derived from the target host. Retailers serve different
/// markup (or nothing) to referer-less requests.
pub(crate) fn referer_for_host(url: &str) -> &'static str {
    let lowered = url.to_lowercase();
    if lowered.contains("amazon") {
        "https://www.amazon.in/"
    } else if lowered.contains("meesho.com") {
        "https://www.meesho.com/"
    } else if lowered.contains("flipkart") || lowered.contains("flixcart") {
        "https://www.flipkart.com/"
    } else if lowered.contains("myntra") || lowered.contains("myntassets.com") {
        "https://www.myntra.com/"
    } else {
        "https://www.google.com/"
    }
}

/// Read-only third-party rendering-proxy address for a page.
pub(crate) fn mirror_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("https://r.jina.ai/http://{rest}")
    } else if url.starts_with("http://") {
        format!("https://r.jina.ai/{url}")
    } else {
        format!("https://r.jina.ai/http://{url}")
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
