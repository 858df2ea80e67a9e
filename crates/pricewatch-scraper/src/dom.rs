//! Ordered CSS-selector chains over parsed documents.
//!
//! Each retailer keeps per-field selector lists reflecting current and
//! historical markup; lists are intentionally redundant to survive site
//! redesigns. The first selector yielding a usable value wins and
//! evaluation stops — there is no merging across selectors.

use scraper::{ElementRef, Html, Selector};

use crate::normalize::{parse_count, parse_price, parse_rating, pick_from_srcset};

/// Attribute ladder for image elements, tried before `srcset` parsing.
const IMAGE_ATTRS: [&str; 4] = ["src", "data-src", "data-original", "data-lazy"];

fn first_match<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let parsed = Selector::parse(selector).expect("valid selector");
    doc.select(&parsed).next()
}

/// First element matched by any selector in the chain.
pub(crate) fn first_element<'a>(doc: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| first_match(doc, sel))
}

/// Attribute of the first element matched by any selector in the chain.
pub(crate) fn first_attr(doc: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .find_map(|el| {
            el.value()
                .attr(attr)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
}

/// Text content of an element, or the `content` attribute for `<meta>`.
fn element_text(el: ElementRef<'_>) -> Option<String> {
    let raw = if el.value().name() == "meta" {
        el.value().attr("content")?.to_string()
    } else {
        el.text().collect::<String>()
    };
    let trimmed = raw.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// First non-empty text (or meta `content`) across the selector chain.
pub(crate) fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .find_map(element_text)
}

/// First selector whose text parses as a price. A normalizer miss skips
/// that selector, not the whole field.
pub(crate) fn first_price(doc: &Html, selectors: &[&str]) -> Option<f64> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .filter_map(element_text)
        .find_map(|text| parse_price(&text))
}

pub(crate) fn first_rating(doc: &Html, selectors: &[&str]) -> Option<f64> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .filter_map(element_text)
        .find_map(|text| parse_rating(&text))
}

pub(crate) fn first_count(doc: &Html, selectors: &[&str]) -> Option<u32> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .filter_map(element_text)
        .find_map(|text| parse_count(&text))
}

/// Image URL from an element: direct attributes in preference order, then
/// the best `srcset`/`data-srcset` candidate.
pub(crate) fn image_from_element(el: ElementRef<'_>) -> Option<String> {
    for attr in IMAGE_ATTRS {
        if let Some(value) = el.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    for attr in ["srcset", "data-srcset"] {
        if let Some(srcset) = el.value().attr(attr) {
            if let Some(best) = pick_from_srcset(srcset) {
                return Some(best);
            }
        }
    }
    None
}

/// First selector yielding an image URL via [`image_from_element`].
pub(crate) fn first_image(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| first_match(doc, sel))
        .find_map(image_from_element)
}
