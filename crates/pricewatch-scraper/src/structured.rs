//! Embedded structured-data harvesting and generic traversal.
//!
//! Pages embed product data in several shapes: JSON-LD blocks, framework
//! hydration payloads (`__NEXT_DATA__`), global state assignments
//! (`__APOLLO_STATE__`, `dataLayer`), and ad-hoc inline objects. This
//! module collects all of them as `serde_json::Value` blobs and provides
//! bounded breadth-first lookups over the resulting nested structures.

use std::collections::VecDeque;

use regex::Regex;
use serde_json::Value;

use crate::normalize::to_float;

/// Upper bound on nodes visited by one breadth-first lookup. Guarantees
/// termination on pathological hydration payloads.
const NODE_VISIT_CAP: usize = 150_000;

/// How far back from a price-like key the generic blob scan will look for
/// an enclosing `{`.
const BLOB_BACKSCAN_WINDOW: usize = 20_000;

/// How many candidate `{` positions the generic blob scan tries per key
/// occurrence before giving up.
const BLOB_BACKSCAN_ATTEMPTS: usize = 32;

/// Blob-scan key priority used by retailers whose hydration payloads carry
/// the price under framework-specific names.
pub(crate) const PRICE_KEY_PRIORITY: [&str; 9] = [
    "finalPrice",
    "youPay",
    "offerPrice",
    "sellingPrice",
    "currentPrice",
    "price",
    "displayPrice",
    "totalPayable",
    "amount",
];

/// Collects every parseable structured-data blob embedded in `html`.
///
/// Sources, in order: JSON-LD / `application/json` script blocks, the
/// `__NEXT_DATA__` hydration payload, `__APOLLO_STATE__` assignments,
/// `dataLayer` literals and pushes, and finally any inline object whose
/// text mentions a price-like key.
pub(crate) fn harvest_json_blobs(html: &str) -> Vec<Value> {
    let mut blobs = Vec::new();

    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/(?:ld\+)?json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");
    for cap in script_re.captures_iter(html) {
        if let Some(value) = cap.get(1).and_then(|m| parse_json_loose(m.as_str())) {
            blobs.push(value);
        }
    }

    let next_data_re =
        Regex::new(r#"(?is)<script[^>]+id\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
            .expect("valid regex");
    if let Some(value) = next_data_re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .and_then(|m| parse_json_loose(m.as_str()))
    {
        blobs.push(value);
    }

    let apollo_re = Regex::new(r"__APOLLO_STATE__\s*=\s*").expect("valid regex");
    if let Some(m) = apollo_re.find(html) {
        if let Some(span) = extract_balanced_object(&html[m.end()..]) {
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                blobs.push(value);
            }
        }
    }

    let data_layer_re = Regex::new(r"dataLayer\s*=\s*").expect("valid regex");
    for m in data_layer_re.find_iter(html) {
        if let Some(span) = extract_balanced_array(&html[m.end()..]) {
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                blobs.push(value);
            }
        }
    }
    let data_layer_push_re = Regex::new(r"dataLayer\.push\(\s*").expect("valid regex");
    for m in data_layer_push_re.find_iter(html) {
        if let Some(span) = extract_balanced_object(&html[m.end()..]) {
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                blobs.push(value);
            }
        }
    }

    blobs.extend(harvest_price_key_blobs(html));

    blobs
}

/// Scans raw HTML for inline objects mentioning a price-like key.
///
/// First match wins downstream, and the heuristic cannot tell a selling
/// price from a struck-through MRP or an unrelated recommendation — a
/// known source of wrong prices, kept as-is.
fn harvest_price_key_blobs(html: &str) -> Vec<Value> {
    let key_re = Regex::new(
        r#""(?:finalPrice|youPay|offerPrice|sellingPrice|currentPrice|price)"\s*:"#,
    )
    .expect("valid regex");

    let mut blobs = Vec::new();
    for m in key_re.find_iter(html) {
        if let Some(span) = balanced_object_containing(html, m.start()) {
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                blobs.push(value);
            }
        }
    }
    blobs
}

/// Finds the smallest balanced object that starts at or before `key_pos`
/// and extends past it, trying the nearest enclosing `{` candidates first.
fn balanced_object_containing(html: &str, key_pos: usize) -> Option<&str> {
    // Snap the window floor to a char boundary; the raw offset may land
    // inside a multi-byte character (₹ in price text).
    let mut floor = key_pos.saturating_sub(BLOB_BACKSCAN_WINDOW);
    while floor < key_pos && !html.is_char_boundary(floor) {
        floor += 1;
    }
    let mut cursor = key_pos;
    for _ in 0..BLOB_BACKSCAN_ATTEMPTS {
        let open = html[floor..cursor].rfind('{')? + floor;
        if let Some(span) = extract_balanced_object(&html[open..]) {
            if open + span.len() > key_pos {
                return Some(span);
            }
        }
        cursor = open;
    }
    None
}

/// Parses `text` as JSON, falling back to the first balanced `{…}` span
/// when the block carries leading/trailing junk (CDATA wrappers, stray
/// commas, HTML comments).
pub(crate) fn parse_json_loose(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let span = extract_balanced_object(&trimmed[start..])?;
    serde_json::from_str::<Value>(span).ok()
}

/// Extracts a balanced JSON object from the start of `s`.
///
/// Scans character-by-character tracking brace depth, respecting string
/// literals and escape sequences. Returns the shortest prefix forming a
/// complete `{…}` object, or `None` if unterminated. Only `}` at depth 0
/// triggers a return, so `{42]` is never accepted.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    extract_balanced(s, '{', '}')
}

/// Array counterpart of [`extract_balanced_object`].
pub(crate) fn extract_balanced_array(s: &str) -> Option<&str> {
    extract_balanced(s, '[', ']')
}

fn extract_balanced(s: &str, open: char, close: char) -> Option<&str> {
    if !s.starts_with(open) {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    if c == close {
                        return Some(&s[..=i]);
                    }
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

/// Breadth-first search for the first positive numeric value stored under
/// any of `keys`.
///
/// Key priority applies per node (the highest-priority key present at a
/// node wins there), but traversal order decides which node is inspected
/// first. Visits at most [`NODE_VISIT_CAP`] nodes.
pub(crate) fn find_first_numeric(root: &Value, keys: &[&str]) -> Option<f64> {
    let mut queue: VecDeque<&Value> = VecDeque::new();
    queue.push_back(root);
    let mut visited = 0usize;

    while let Some(node) = queue.pop_front() {
        visited += 1;
        if visited > NODE_VISIT_CAP {
            return None;
        }
        match node {
            Value::Object(map) => {
                for key in keys {
                    if let Some(candidate) = map.get(*key) {
                        if let Some(price) = numeric_value(candidate).filter(|p| *p > 0.0) {
                            return Some(price);
                        }
                    }
                }
                queue.extend(map.values().filter(|v| v.is_object() || v.is_array()));
            }
            Value::Array(items) => {
                queue.extend(items.iter().filter(|v| v.is_object() || v.is_array()));
            }
            _ => {}
        }
    }
    None
}

/// Breadth-first search for the first image-looking URL under common
/// image keys, with one level of list/object unwrapping. Bounded like
/// [`find_first_numeric`].
pub(crate) fn find_first_image(root: &Value) -> Option<String> {
    const IMAGE_KEYS: [&str; 5] = ["image", "imageUrl", "thumbnail", "primaryImage", "url"];
    let ext_re = Regex::new(r"(?i)\.(?:jpg|jpeg|png|webp)(?:\?|$)").expect("valid regex");

    let looks_like_image = |v: &Value| -> Option<String> {
        v.as_str()
            .filter(|s| ext_re.is_match(s))
            .map(str::to_string)
    };

    let mut queue: VecDeque<&Value> = VecDeque::new();
    queue.push_back(root);
    let mut visited = 0usize;

    while let Some(node) = queue.pop_front() {
        visited += 1;
        if visited > NODE_VISIT_CAP {
            return None;
        }
        match node {
            Value::Object(map) => {
                for key in IMAGE_KEYS {
                    let Some(candidate) = map.get(key) else {
                        continue;
                    };
                    if let Some(found) = looks_like_image(candidate) {
                        return Some(found);
                    }
                    if let Some(items) = candidate.as_array() {
                        for item in items {
                            if let Some(found) = looks_like_image(item) {
                                return Some(found);
                            }
                            if let Some(inner) = item.as_object() {
                                for inner_key in ["url", "image", "imageUrl"] {
                                    if let Some(found) =
                                        inner.get(inner_key).and_then(&looks_like_image)
                                    {
                                        return Some(found);
                                    }
                                }
                            }
                        }
                    }
                }
                queue.extend(map.values().filter(|v| v.is_object() || v.is_array()));
            }
            Value::Array(items) => {
                queue.extend(items.iter().filter(|v| v.is_object() || v.is_array()));
            }
            _ => {}
        }
    }
    None
}

/// Numbers pass through; numeric strings ("1,299.00") are normalized.
pub(crate) fn numeric_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => to_float(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // balanced span extraction
    // -----------------------------------------------------------------------

    #[test]
    fn balanced_object_with_nesting_and_trailing_junk() {
        let s = r#"{"a":{"b":[1,2]},"c":"x"};</script>"#;
        assert_eq!(
            extract_balanced_object(s),
            Some(r#"{"a":{"b":[1,2]},"c":"x"}"#)
        );
    }

    #[test]
    fn balanced_object_respects_braces_inside_strings() {
        let s = r#"{"a":"}{"} rest"#;
        assert_eq!(extract_balanced_object(s), Some(r#"{"a":"}{"}"#));
    }

    #[test]
    fn balanced_object_rejects_mismatched_closer() {
        assert_eq!(extract_balanced_object("{42]"), None);
    }

    #[test]
    fn balanced_array_rejects_mismatched_closer() {
        assert_eq!(extract_balanced_array("[42}"), None);
    }

    #[test]
    fn balanced_object_unterminated_is_none() {
        assert_eq!(extract_balanced_object(r#"{"a": 1"#), None);
    }

    // -----------------------------------------------------------------------
    // loose JSON parsing
    // -----------------------------------------------------------------------

    #[test]
    fn loose_parse_strict_json() {
        assert_eq!(parse_json_loose(r#"{"a":1}"#), Some(json!({"a":1})));
    }

    #[test]
    fn loose_parse_recovers_wrapped_object() {
        let wrapped = r#"//<![CDATA[ {"price": 499} //]]>"#;
        assert_eq!(parse_json_loose(wrapped), Some(json!({"price": 499})));
    }

    #[test]
    fn loose_parse_garbage_is_none() {
        assert_eq!(parse_json_loose("window.foo = bar;"), None);
    }

    // -----------------------------------------------------------------------
    // blob harvesting
    // -----------------------------------------------------------------------

    #[test]
    fn harvests_jsonld_script_blocks() {
        let html = r#"
            <script type="application/ld+json">{"@type":"Product","name":"X"}</script>
        "#;
        let blobs = harvest_json_blobs(html);
        assert!(blobs.iter().any(|b| b["@type"] == "Product"));
    }

    #[test]
    fn harvests_next_data_payload() {
        let html = r#"
            <script id="__NEXT_DATA__" type="application/json">
            {"props":{"pageProps":{"finalPrice":1499}}}
            </script>
        "#;
        let blobs = harvest_json_blobs(html);
        assert!(blobs
            .iter()
            .any(|b| b["props"]["pageProps"]["finalPrice"] == 1499));
    }

    #[test]
    fn harvests_apollo_state_assignment() {
        let html = r#"<script>window.__APOLLO_STATE__ = {"Product:1":{"sellingPrice":799}};</script>"#;
        let blobs = harvest_json_blobs(html);
        assert!(blobs.iter().any(|b| b["Product:1"]["sellingPrice"] == 799));
    }

    #[test]
    fn harvests_data_layer_literal_and_push() {
        let html = r#"
            <script>
            dataLayer = [{"ecommerce":{"price":"599"}}];
            dataLayer.push({"event":"view","price":"650"});
            </script>
        "#;
        let blobs = harvest_json_blobs(html);
        assert!(blobs.iter().any(|b| b[0]["ecommerce"]["price"] == "599"));
        assert!(blobs.iter().any(|b| b["price"] == "650"));
    }

    #[test]
    fn harvests_generic_price_key_blob() {
        let html = r#"<script>var state = {"widget":{"offerPrice":1234,"sku":"A1"}};</script>"#;
        let blobs = harvest_json_blobs(html);
        assert!(blobs
            .iter()
            .any(|b| find_first_numeric(b, &PRICE_KEY_PRIORITY) == Some(1234.0)));
    }

    // -----------------------------------------------------------------------
    // bounded BFS lookups
    // -----------------------------------------------------------------------

    #[test]
    fn numeric_found_in_nested_structure() {
        let blob = json!({"a":{"b":[{"c":1},{"finalPrice":"1,299.50"}]}});
        assert_eq!(
            find_first_numeric(&blob, &PRICE_KEY_PRIORITY),
            Some(1299.50)
        );
    }

    #[test]
    fn numeric_key_priority_applies_per_node() {
        let blob = json!({"price": 100, "finalPrice": 80});
        assert_eq!(find_first_numeric(&blob, &PRICE_KEY_PRIORITY), Some(80.0));
    }

    #[test]
    fn numeric_skips_zero_values() {
        let blob = json!({"price": 0, "next": {"price": 250}});
        assert_eq!(find_first_numeric(&blob, &PRICE_KEY_PRIORITY), Some(250.0));
    }

    #[test]
    fn numeric_traversal_terminates_past_node_cap() {
        // Wider than the visit cap: the lookup must bail out, not hang.
        let wide: Vec<Value> = (0..200_000).map(|_| json!({})).collect();
        let blob = Value::Array(wide);
        assert_eq!(find_first_numeric(&blob, &PRICE_KEY_PRIORITY), None);
    }

    #[test]
    fn image_found_under_common_key() {
        let blob = json!({"product":{"thumbnail":"https://cdn.test/a.webp"}});
        assert_eq!(
            find_first_image(&blob),
            Some("https://cdn.test/a.webp".to_string())
        );
    }

    #[test]
    fn image_unwraps_one_list_level() {
        let blob = json!({"image":[{"url":"https://cdn.test/b.jpg?w=100"}]});
        assert_eq!(
            find_first_image(&blob),
            Some("https://cdn.test/b.jpg?w=100".to_string())
        );
    }

    #[test]
    fn image_ignores_non_image_urls() {
        let blob = json!({"url":"https://example.com/page.html"});
        assert_eq!(find_first_image(&blob), None);
    }
}
