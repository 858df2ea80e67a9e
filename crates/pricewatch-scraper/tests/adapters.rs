//! Integration tests for the extraction engine.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made. Adapters are driven through
//! [`pricewatch_scraper::dispatch`] against the mock server; the router's
//! placeholder conversions are exercised through `fetch_product`.

use pricewatch_core::{FetchConfig, Platform, PLACEHOLDER_IMAGE};
use pricewatch_scraper::{dispatch, fetch_product, HttpClient, ScrapeError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client suitable for tests: short timeout, no politeness delay, no
/// mirror fallback.
fn test_client() -> HttpClient {
    HttpClient::new(&FetchConfig::immediate(5)).expect("failed to build test HttpClient")
}

async fn serve_html(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// End-to-end: structured data + meta fallbacks + protocol upgrade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn synthetic_page_extracts_title_price_and_upgraded_image() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        r#"
        <html><head>
        <meta property="og:title" content="Test Product">
        <meta property="og:image" content="http://cdn.test/x.jpg">
        <script type="application/ld+json">
        {"@type":"Product","name":"Test Product","offers":{"@type":"Offer","price":"499"}}
        </script>
        </head><body></body></html>
        "#,
    )
    .await;

    let client = test_client();
    let url = format!("{}/product", server.uri());
    let snapshot = dispatch(Platform::Flipkart, &client, &url)
        .await
        .expect("extraction succeeds");

    assert_eq!(snapshot.title, "Test Product");
    assert_eq!(snapshot.price, Some(499.0));
    assert_eq!(snapshot.image.as_deref(), Some("https://cdn.test/x.jpg"));
    assert_eq!(snapshot.rating, None);
    assert_eq!(snapshot.rating_count, None);
}

// ---------------------------------------------------------------------------
// Blocked pages terminate before field extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn robot_check_page_reports_blocked() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        r#"
        <html><body>
        <h1>Enter the characters you see below</h1>
        <p>Sorry, we just need to make sure you're not a robot. Robot Check</p>
        <span id="productTitle">This must never be extracted</span>
        </body></html>
        "#,
    )
    .await;

    let client = test_client();
    let url = format!("{}/product", server.uri());
    let result = dispatch(Platform::Amazon, &client, &url).await;

    assert!(
        matches!(result, Err(ScrapeError::Blocked { .. })),
        "expected Blocked, got: {result:?}"
    );
}

#[tokio::test]
async fn meesho_chain_exhausts_transports_on_challenge_pages() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "<html><head><title>Just a moment...</title></head><body></body></html>",
    )
    .await;

    let client = test_client();
    let url = format!("{}/product", server.uri());
    let result = dispatch(Platform::Meesho, &client, &url).await;

    assert!(
        matches!(result, Err(ScrapeError::Blocked { .. })),
        "every transport saw a challenge page; expected Blocked, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Parse failure and transport failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_without_title_reports_missing_title() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "<html><body><span class='final-price'>₹499</span></body></html>",
    )
    .await;

    let client = test_client();
    let url = format!("{}/product", server.uri());
    let result = dispatch(Platform::Nykaa, &client, &url).await;

    assert!(
        matches!(result, Err(ScrapeError::MissingTitle { .. })),
        "expected MissingTitle, got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client();
    let url = format!("{}/product", server.uri());
    let result = dispatch(Platform::Ajio, &client, &url).await;

    assert!(
        matches!(result, Err(ScrapeError::Status { status: 503, .. })),
        "expected Status 503, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Router placeholder conversions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_platform_yields_manual_entry_record() {
    let client = test_client();
    let record = fetch_product(&client, "https://example.com/product").await;

    assert_eq!(record.title, "Manual Entry");
    assert_eq!(record.price, 0.0);
    assert_eq!(record.image_url, PLACEHOLDER_IMAGE);
    assert_eq!(record.platform, Platform::Unknown);
}

#[tokio::test]
async fn adapter_failure_yields_failed_fetch_record() {
    // Routes to the Amazon adapter, but the reserved .invalid TLD can
    // never resolve, so the transport fails and the router folds it.
    let client = test_client();
    let record = fetch_product(&client, "https://amazon.invalid/dp/B0TEST").await;

    assert_eq!(record.title, "Product (Failed to fetch details)");
    assert_eq!(record.price, 0.0);
    assert_eq!(record.image_url, PLACEHOLDER_IMAGE);
    assert_eq!(record.platform, Platform::Unknown);
}

// ---------------------------------------------------------------------------
// Dispatch on Unknown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dispatch_on_unknown_platform_is_an_error() {
    let client = test_client();
    let result = dispatch(Platform::Unknown, &client, "https://example.com/p").await;
    assert!(matches!(result, Err(ScrapeError::UnknownPlatform { .. })));
}
