use super::*;

// -----------------------------------------------------------------------
// parse_price / to_float
// -----------------------------------------------------------------------

#[test]
fn price_with_rupee_symbol_and_separators() {
    assert_eq!(parse_price("₹12,345.50"), Some(12345.50));
}

#[test]
fn price_with_symbol_and_spacing() {
    assert_eq!(parse_price("₹ 1,299"), Some(1299.0));
}

#[test]
fn price_prefers_symbol_adjacent_number() {
    // Strike-through pricing puts several numbers in one string; the
    // rupee-anchored pattern wins over a blind digit strip.
    assert_eq!(parse_price("MRP ₹2,499 (48% off)"), Some(2499.0));
}

#[test]
fn price_plain_number_without_symbol() {
    assert_eq!(parse_price("499"), Some(499.0));
}

#[test]
fn price_rejects_empty_and_non_numeric() {
    assert_eq!(parse_price(""), None);
    assert_eq!(parse_price("N/A"), None);
    assert_eq!(parse_price("Out of stock"), None);
}

#[test]
fn to_float_strips_thousands_separators() {
    assert_eq!(to_float("1,23,456"), Some(123_456.0));
}

#[test]
fn to_float_rejects_no_digits() {
    assert_eq!(to_float("free shipping"), None);
}

#[test]
fn to_float_first_number_wins() {
    assert_eq!(to_float("4.2 (1,031 ratings)"), Some(4.2));
}

// -----------------------------------------------------------------------
// parse_count / parse_rating
// -----------------------------------------------------------------------

#[test]
fn count_with_separator() {
    assert_eq!(parse_count("1,031 ratings"), Some(1031));
}

#[test]
fn count_without_digits() {
    assert_eq!(parse_count("no reviews yet"), None);
}

#[test]
fn rating_from_star_text() {
    assert_eq!(parse_rating("4.3 out of 5 stars"), Some(4.3));
}

// -----------------------------------------------------------------------
// srcset resolution
// -----------------------------------------------------------------------

#[test]
fn srcset_picks_highest_density() {
    assert_eq!(
        pick_from_srcset("img1.jpg 1x, img2.jpg 3x"),
        Some("img2.jpg".to_string())
    );
}

#[test]
fn srcset_picks_largest_width() {
    assert_eq!(
        pick_from_srcset("a.jpg 320w, b.jpg 640w, c.jpg 480w"),
        Some("b.jpg".to_string())
    );
}

#[test]
fn srcset_descriptor_without_digits_defaults_to_one() {
    assert_eq!(
        pick_from_srcset("a.jpg x, b.jpg 2x"),
        Some("b.jpg".to_string())
    );
}

#[test]
fn srcset_tie_keeps_first_seen() {
    assert_eq!(
        pick_from_srcset("first.jpg 2x, second.jpg 2x"),
        Some("first.jpg".to_string())
    );
}

#[test]
fn srcset_empty_yields_none() {
    assert_eq!(pick_from_srcset(""), None);
}

// -----------------------------------------------------------------------
// dynamic image map resolution
// -----------------------------------------------------------------------

#[test]
fn dynamic_image_picks_largest_area() {
    let attr = r#"{"a.jpg":[100,100],"b.jpg":[500,500]}"#;
    assert_eq!(pick_largest_dynamic_image(attr), Some("b.jpg".to_string()));
}

#[test]
fn dynamic_image_rejects_malformed_json() {
    assert_eq!(pick_largest_dynamic_image("{not json"), None);
}

#[test]
fn dynamic_image_rejects_empty_map() {
    assert_eq!(pick_largest_dynamic_image("{}"), None);
}

#[test]
fn dynamic_image_rejects_missing_dimensions() {
    assert_eq!(pick_largest_dynamic_image(r#"{"a.jpg":[100]}"#), None);
}

// -----------------------------------------------------------------------
// URL normalization
// -----------------------------------------------------------------------

#[test]
fn https_upgrade_protocol_relative() {
    assert_eq!(
        ensure_https("//cdn.test/x.jpg"),
        "https://cdn.test/x.jpg"
    );
}

#[test]
fn https_upgrade_plain_http() {
    assert_eq!(
        ensure_https("http://cdn.test/x.jpg"),
        "https://cdn.test/x.jpg"
    );
}

#[test]
fn https_leaves_secure_urls_alone() {
    assert_eq!(
        ensure_https("https://cdn.test/x.jpg"),
        "https://cdn.test/x.jpg"
    );
}

#[test]
fn absolutize_resolves_relative_path() {
    assert_eq!(
        absolutize("https://www.croma.com/p/123", "/images/main.jpg"),
        Some("https://www.croma.com/images/main.jpg".to_string())
    );
}

#[test]
fn absolutize_upgrades_absolute_http() {
    assert_eq!(
        absolutize("https://www.croma.com/p/123", "http://cdn.croma.com/x.jpg"),
        Some("https://cdn.croma.com/x.jpg".to_string())
    );
}

#[test]
fn absolutize_empty_yields_none() {
    assert_eq!(absolutize("https://www.croma.com/p/123", "  "), None);
}

// -----------------------------------------------------------------------
// Amazon image size-token rewrite
// -----------------------------------------------------------------------

#[test]
fn amazon_size_token_upgraded() {
    assert_eq!(
        upgrade_amazon_image("https://m.media-amazon.com/images/I/abc._SY75_.jpg"),
        "https://m.media-amazon.com/images/I/abc._SL1000_.jpg"
    );
}

#[test]
fn amazon_url_without_token_unchanged() {
    let plain = "https://m.media-amazon.com/images/I/abc.jpg";
    assert_eq!(upgrade_amazon_image(plain), plain);
}

// -----------------------------------------------------------------------
// Title truncation
// -----------------------------------------------------------------------

#[test]
fn title_truncated_to_display_length() {
    let long = "x".repeat(300);
    assert_eq!(truncate_title(&long).chars().count(), 200);
}

#[test]
fn title_trimmed() {
    assert_eq!(truncate_title("  Test Product \n"), "Test Product");
}
