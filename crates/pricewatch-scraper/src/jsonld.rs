//! schema.org typed lookups over harvested JSON-LD blobs.
//!
//! JSON-LD `Product` blocks are the highest-confidence source and are
//! consulted before any DOM selector. Shapes in the wild vary: the
//! Product may be the top-level object, a member of a top-level array,
//! or nested inside an `@graph` container, and `@type` may be a string
//! or an array of strings.

use serde_json::Value;

use crate::structured::numeric_value;

/// Finds the first node of any of the given `@type`s across all blobs.
pub(crate) fn find_typed_node<'a>(blobs: &'a [Value], types: &[&str]) -> Option<&'a Value> {
    for blob in blobs {
        let top_level: Vec<&Value> = match blob {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for item in &top_level {
            if type_matches(item, types) {
                return Some(item);
            }
            if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
                if let Some(found) = graph.iter().find(|g| type_matches(g, types)) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Finds the first schema.org `Product` node across all blobs.
pub(crate) fn find_product_node(blobs: &[Value]) -> Option<&Value> {
    find_typed_node(blobs, &["Product"])
}

fn type_matches(node: &Value, types: &[&str]) -> bool {
    let Some(type_node) = node.get("@type") else {
        return false;
    };
    if let Some(s) = type_node.as_str() {
        return types.iter().any(|t| s.eq_ignore_ascii_case(t));
    }
    if let Some(arr) = type_node.as_array() {
        return arr
            .iter()
            .filter_map(Value::as_str)
            .any(|s| types.iter().any(|t| s.eq_ignore_ascii_case(t)));
    }
    false
}

pub(crate) fn product_name(node: &Value) -> Option<String> {
    node.get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First positive numeric price reachable from the node's `offers`,
/// falling back to node-level `price`/`lowPrice`.
///
/// Handles `Offer`, `AggregateOffer`, a single object or a list of
/// either, and a nested `priceSpecification`.
pub(crate) fn product_price(node: &Value) -> Option<f64> {
    if let Some(price) = node.get("offers").and_then(price_from_offers) {
        return Some(price);
    }
    for key in ["price", "lowPrice"] {
        if let Some(price) = node.get(key).and_then(positive_numeric) {
            return Some(price);
        }
    }
    None
}

fn price_from_offers(offers: &Value) -> Option<f64> {
    match offers {
        Value::Object(map) => {
            for key in ["price", "lowPrice", "highPrice"] {
                if let Some(price) = map.get(key).and_then(positive_numeric) {
                    return Some(price);
                }
            }
            if let Some(spec) = map.get("priceSpecification") {
                for key in ["price", "minPrice", "maxPrice"] {
                    if let Some(price) = spec.get(key).and_then(positive_numeric) {
                        return Some(price);
                    }
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(price_from_offers),
        _ => None,
    }
}

/// The `image` field: a plain URL string, the first string of a list, or
/// the `url` member of the first object in a list.
pub(crate) fn product_image(node: &Value) -> Option<String> {
    let image = node.get("image")?;
    match image {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => map
                .get("url")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }),
        _ => None,
    }
}

pub(crate) fn product_rating(node: &Value) -> Option<f64> {
    node.get("aggregateRating")
        .and_then(|agg| agg.get("ratingValue"))
        .and_then(positive_numeric)
}

/// `aggregateRating.reviewCount`, or `ratingCount` when absent, coerced
/// to an integer.
pub(crate) fn product_rating_count(node: &Value) -> Option<u32> {
    let agg = node.get("aggregateRating")?;
    let raw = agg.get("reviewCount").or_else(|| agg.get("ratingCount"))?;
    let count = numeric_value(raw)?;
    if count < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(count as u32)
}

fn positive_numeric(v: &Value) -> Option<f64> {
    numeric_value(v).filter(|p| *p > 0.0)
}
