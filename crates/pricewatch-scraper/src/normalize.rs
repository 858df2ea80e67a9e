//! Field normalizers: raw extracted text to typed values.
//!
//! All functions are pure and total over strings — malformed input yields
//! `None`, never a panic that could escape an adapter.

use regex::Regex;

/// Maximum display length of an extracted product title.
const TITLE_MAX_CHARS: usize = 200;

/// Extracts the first numeric substring (digits, commas, dots) and parses
/// it as `f64`. Commas are treated as thousands separators and stripped.
pub(crate) fn to_float(raw: &str) -> Option<f64> {
    let re = Regex::new(r"[\d.,]+").expect("valid regex");
    let m = re.find(raw)?;
    let cleaned = m.as_str().replace(',', "");
    cleaned.parse::<f64>().ok().filter(|p| *p >= 0.0)
}

/// Parses a currency string into a price.
///
/// A rupee-anchored pattern is tried before the generic digit-strip
/// fallback so strings carrying several numbers ("₹1,299 ₹2,499 48% off")
/// resolve to the symbol-adjacent value.
pub(crate) fn parse_price(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return None;
    }
    let rupee = Regex::new(r"₹\s*([\d,]+(?:\.\d+)?)").expect("valid regex");
    if let Some(cap) = rupee.captures(raw) {
        if let Ok(price) = cap[1].replace(',', "").parse::<f64>() {
            return Some(price);
        }
    }
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|p| *p >= 0.0)
}

/// Extracts the first integer-looking run ("1,234" → 1234) for rating
/// counts.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let re = Regex::new(r"[\d,]+").expect("valid regex");
    let m = re.find(raw)?;
    m.as_str().replace(',', "").parse::<u32>().ok()
}

/// Extracts the first decimal number ("4.3 out of 5 stars" → 4.3).
pub(crate) fn parse_rating(raw: &str) -> Option<f64> {
    let re = Regex::new(r"\d+(?:\.\d+)?").expect("valid regex");
    let m = re.find(raw)?;
    m.as_str().parse::<f64>().ok()
}

/// Picks the highest-quality candidate from an HTML `srcset` value.
///
/// Each entry is `url descriptor` where the descriptor is a density (`2x`)
/// or width (`640w`) token; entries without digits weigh 1. Strictly
/// greater comparison keeps the first-seen maximum on ties.
pub(crate) fn pick_from_srcset(srcset: &str) -> Option<String> {
    let digits = Regex::new(r"\d+").expect("valid regex");
    let mut best: Option<(String, u64)> = None;
    for part in srcset.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut pieces = part.split_whitespace();
        let Some(candidate_url) = pieces.next() else {
            continue;
        };
        let weight = pieces
            .next()
            .and_then(|d| digits.find(d))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(1);
        if best.as_ref().is_none_or(|(_, w)| weight > *w) {
            best = Some((candidate_url.to_string(), weight));
        }
    }
    best.map(|(candidate_url, _)| candidate_url)
}

/// Resolves a `data-a-dynamic-image`-style JSON map of `URL → [width,
/// height]` to the URL with the largest pixel area.
///
/// Returns `None` on parse failure, an empty map, or entries without two
/// numeric dimensions.
pub(crate) fn pick_largest_dynamic_image(attr: &str) -> Option<String> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(attr).ok()?;
    let mut best: Option<(String, f64)> = None;
    for (candidate_url, dims) in &map {
        let dims = dims.as_array()?;
        let width = dims.first().and_then(serde_json::Value::as_f64)?;
        let height = dims.get(1).and_then(serde_json::Value::as_f64)?;
        let area = width * height;
        if best.as_ref().is_none_or(|(_, a)| area > *a) {
            best = Some((candidate_url.clone(), area));
        }
    }
    best.map(|(candidate_url, _)| candidate_url)
}

/// Upgrades protocol-relative and plain-HTTP URLs to HTTPS.
pub(crate) fn ensure_https(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if let Some(rest) = raw.strip_prefix("http://") {
        return format!("https://{rest}");
    }
    raw.to_string()
}

/// Resolves `raw` against the page URL, upgrading the result to HTTPS.
///
/// Protocol-relative and absolute inputs short-circuit; anything else is
/// joined onto `base`. Unresolvable input yields `None`.
pub(crate) fn absolutize(base: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("//") || raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(ensure_https(raw));
    }
    let joined = url::Url::parse(base).ok()?.join(raw).ok()?;
    Some(ensure_https(joined.as_str()))
}

/// Rewrites an Amazon image size token (`._SY75_.`, `._SX342_.`, …) to
/// `._SL1000_.` to request a higher-resolution variant. Cosmetic
/// best-effort only — unrecognized URLs pass through unchanged.
pub(crate) fn upgrade_amazon_image(raw: &str) -> String {
    let re = Regex::new(r"\._[A-Z]{2}\d+.*?_\.").expect("valid regex");
    re.replace_all(raw, "._SL1000_.").into_owned()
}

/// Trims and truncates a title to the maximum display length,
/// char-boundary safe.
pub(crate) fn truncate_title(raw: &str) -> String {
    raw.trim().chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
