/// Transport settings consumed by the scraper's HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Per-request budget covering connect, redirects, and body read.
    pub timeout_secs: u64,
    /// Politeness pause before every request, drawn uniformly from
    /// `[delay_min_ms, delay_max_ms]`.
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Whether hard-blocked sites may fall back to the read-only
    /// rendering-proxy mirror.
    pub mirror_fallback: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            delay_min_ms: 1000,
            delay_max_ms: 2000,
            mirror_fallback: true,
        }
    }
}

impl FetchConfig {
    /// A config with no politeness delay and no mirror fallback, for tests
    /// that hit a local mock server.
    #[must_use]
    pub fn immediate(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            delay_min_ms: 0,
            delay_max_ms: 0,
            mirror_fallback: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Upper bound on concurrently running extraction invocations in batch
    /// mode. Each invocation is one real network request chain.
    pub max_concurrent_checks: usize,
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_concurrent_checks: 4,
            fetch: FetchConfig::default(),
        }
    }
}
