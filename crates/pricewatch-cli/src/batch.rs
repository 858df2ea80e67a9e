//! Bounded-concurrency batch checking.
//!
//! Each URL is an independent extraction invocation; the worker pool only
//! bounds how many run at once so a large batch does not look like an
//! abusive crawl to the target sites.

use std::path::Path;

use futures::stream::{self, StreamExt};
use pricewatch_core::{price_target_reached, AppConfig, ProductRecord};
use pricewatch_scraper::HttpClient;

#[derive(serde::Serialize)]
struct BatchLine<'a> {
    url: &'a str,
    checked_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    record: ProductRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_reached: Option<bool>,
}

pub(crate) async fn run(
    client: &HttpClient,
    config: &AppConfig,
    file: &Path,
    concurrency: Option<usize>,
    target: Option<f64>,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file).await?;
    let urls = parse_url_lines(&raw);
    if urls.is_empty() {
        anyhow::bail!("no URLs found in {}", file.display());
    }

    let max_concurrent = concurrency.unwrap_or(config.max_concurrent_checks).max(1);
    tracing::info!(count = urls.len(), max_concurrent, "starting batch check");

    let results: Vec<(&str, ProductRecord)> = stream::iter(urls)
        .map(|url| async move { (url, pricewatch_scraper::fetch_product(client, url).await) })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut reached = 0usize;
    for (url, record) in results {
        let extracted_price = (record.price > 0.0).then_some(record.price);
        let target_reached = target.map(|t| price_target_reached(extracted_price, t));
        if target_reached == Some(true) {
            reached += 1;
        }
        let line = BatchLine {
            url,
            checked_at: chrono::Utc::now(),
            record,
            target_reached,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    tracing::info!(reached, "batch check complete");
    Ok(())
}

fn parse_url_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
