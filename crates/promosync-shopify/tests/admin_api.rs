//! Integration tests for `ShopifySession` against a mocked Admin API.
//!
//! Each test stands up its own `wiremock` server; the session is opened with
//! the server's `http://` origin so no real store is contacted.

use std::time::{Duration, Instant};

use promosync_core::{DestinationSink, ProductDraft, SyncError, VariantDraft};
use promosync_shopify::{ShopifyError, ShopifySession};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/admin/api/2024-04";

/// Session with no lookup delay and no retries.
fn test_session(server: &MockServer) -> ShopifySession {
    ShopifySession::open(&server.uri(), "shpat_test", "2024-04", 5)
        .expect("failed to open test session")
        .with_lookup_delay(0)
}

fn variant_edge(variant_id: i64, product_id: i64, sku: &str, price: &str) -> serde_json::Value {
    json!({
        "node": {
            "id": format!("gid://shopify/ProductVariant/{variant_id}"),
            "sku": sku,
            "price": price,
            "product": { "id": format!("gid://shopify/Product/{product_id}") }
        }
    })
}

fn lookup_response(edges: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "data": { "productVariants": { "edges": edges } } })
}

fn draft() -> ProductDraft {
    ProductDraft {
        parent_sku: "TSR-041".to_owned(),
        title: "VASO KIRA".to_owned(),
        body_html: Some("Vaso de doble pared.".to_owned()),
        vendor: "PromoOpción".to_owned(),
        product_type: "VASOS".to_owned(),
        tags: vec!["BEBIDAS".to_owned(), "VASOS".to_owned()],
        variants: vec![VariantDraft {
            sku: "TSR-041-PLATA".to_owned(),
            color: Some("PLATA".to_owned()),
            price: Decimal::new(12_833, 2),
        }],
        images: vec!["https://img.example/a.jpg".to_owned()],
    }
}

// ---------------------------------------------------------------------------
// SKU lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_returns_exact_match_with_numeric_ids() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(body_partial_json(json!({ "variables": { "query": "sku:\"TSR-041-PLATA\"" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![
            variant_edge(11, 7, "TSR-041-PLATA-XL", "99.00"),
            variant_edge(12, 7, "TSR-041-PLATA", "128.33"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let found = session
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect("lookup should succeed")
        .expect("variant should be found");

    assert_eq!(found.variant_id, 12);
    assert_eq!(found.product_id, 7);
    assert_eq!(found.price, Decimal::new(12_833, 2));
}

#[tokio::test]
async fn lookup_returns_none_when_only_near_matches_exist() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![
            variant_edge(11, 7, "TSR-041-PLATA-XL", "99.00"),
        ])))
        .mount(&server)
        .await;

    let found = test_session(&server)
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}

#[tokio::test]
async fn lookup_returns_none_for_empty_edges() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![])))
        .mount(&server)
        .await;

    let found = test_session(&server)
        .lookup_variant_by_sku("NOPE-1")
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}

#[tokio::test]
async fn lookup_surfaces_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Access denied for productVariants field." }]
        })))
        .mount(&server)
        .await;

    let err = test_session(&server)
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect_err("GraphQL errors should fail the lookup");
    match err {
        ShopifyError::GraphQl(message) => assert!(message.contains("Access denied")),
        other => panic!("expected GraphQl, got: {other:?}"),
    }
}

#[tokio::test]
async fn lookup_retries_after_429() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![
            variant_edge(12, 7, "TSR-041-PLATA", "128.33"),
        ])))
        .mount(&server)
        .await;

    let session = test_session(&server).with_retry(2, 1);
    let found = session
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect("lookup should succeed after retry");
    assert!(found.is_some());
}

#[tokio::test]
async fn lookup_retries_after_graphql_throttle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![
            variant_edge(12, 7, "TSR-041-PLATA", "128.33"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let found = test_session(&server)
        .with_retry(2, 0)
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect("lookup should succeed after the throttle clears");
    assert_eq!(found.map(|v| v.variant_id), Some(12));
}

#[tokio::test]
async fn lookup_throttle_without_retries_reports_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "extensions": { "code": "THROTTLED" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_session(&server)
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect_err("throttle should fail without retries");
    assert!(matches!(err, ShopifyError::RateLimited { .. }), "got: {err:?}");
}

#[tokio::test]
async fn lookup_waits_the_configured_delay_before_each_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(lookup_response(vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let session = test_session(&server).with_lookup_delay(300);
    let started = Instant::now();
    session.lookup_variant_by_sku("S1").await.expect("first lookup");
    let after_first = started.elapsed();
    session.lookup_variant_by_sku("S2").await.expect("second lookup");
    let after_second = started.elapsed();

    assert!(
        after_first >= Duration::from_millis(300),
        "first lookup returned after {after_first:?}"
    );
    assert!(
        after_second >= Duration::from_millis(600),
        "two lookups returned after {after_second:?}"
    );
}

#[tokio::test]
async fn lookup_without_retries_reports_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_session(&server)
        .lookup_variant_by_sku("TSR-041-PLATA")
        .await
        .expect_err("429 should fail without retries");
    assert!(
        matches!(err, ShopifyError::RateLimited { retry_after_secs: 3 }),
        "expected RateLimited(3), got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Variant reads and writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_variants_lists_every_variant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/products/7.json")))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": {
                "id": 7,
                "title": "VASO KIRA",
                "variants": [
                    { "id": 12, "product_id": 7, "sku": "TSR-041-PLATA", "price": "128.33" },
                    { "id": 13, "product_id": 7, "sku": null, "price": "10.00" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let variants = test_session(&server)
        .product_variants(7)
        .await
        .expect("listing should succeed");

    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].sku, "TSR-041-PLATA");
    assert_eq!(variants[0].price, Decimal::new(12_833, 2));
    assert_eq!(variants[1].sku, "", "missing SKU should read as empty");
    assert_eq!(variants[1].product_id, 7);
}

#[tokio::test]
async fn product_variants_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/products/404.json")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_session(&server)
        .product_variants(404)
        .await
        .expect_err("404 should fail");
    assert!(matches!(err, ShopifyError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn set_variant_price_sends_two_decimal_string() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API}/variants/12.json")))
        .and(body_json(json!({ "variant": { "id": 12, "price": "256.67" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 12 } })))
        .expect(1)
        .mount(&server)
        .await;

    test_session(&server)
        .set_variant_price(12, Decimal::new(2_566_667, 4))
        .await
        .expect("update should succeed");
}

#[tokio::test]
async fn set_variant_price_retries_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API}/variants/12.json")))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{API}/variants/12.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 12 } })))
        .expect(1)
        .mount(&server)
        .await;

    test_session(&server)
        .with_retry(2, 1)
        .set_variant_price(12, Decimal::new(100, 0))
        .await
        .expect("update should succeed after retry");
}

#[tokio::test]
async fn remove_variant_is_sent_once_even_with_retries() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API}/products/7/variants/13.json")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_session(&server)
        .with_retry(3, 1)
        .remove_variant(7, 13)
        .await
        .expect_err("503 should fail the delete");
    assert!(
        matches!(err, ShopifyError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn remove_variant_accepts_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{API}/products/7/variants/13.json")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    test_session(&server)
        .remove_variant(7, 13)
        .await
        .expect("delete should succeed");
}

// ---------------------------------------------------------------------------
// Product creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_product_posts_full_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/products.json")))
        .and(body_json(json!({
            "product": {
                "title": "VASO KIRA",
                "body_html": "Vaso de doble pared.",
                "vendor": "PromoOpción",
                "product_type": "VASOS",
                "tags": "BEBIDAS, VASOS",
                "options": [{ "name": "Color" }],
                "variants": [{
                    "option1": "PLATA",
                    "price": "128.33",
                    "sku": "TSR-041-PLATA",
                    "inventory_management": "shopify"
                }],
                "images": [{ "src": "https://img.example/a.jpg" }]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "product": {
                "id": 900,
                "title": "VASO KIRA",
                "variants": [
                    { "id": 901, "product_id": 900, "sku": "TSR-041-PLATA", "price": "128.33" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = test_session(&server)
        .create_product_from_draft(&draft())
        .await
        .expect("create should succeed");

    assert_eq!(created.id, 900);
    assert_eq!(created.variants.len(), 1);
    assert_eq!(created.variants[0].sku, "TSR-041-PLATA");
}

#[tokio::test]
async fn create_product_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/products.json")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_session(&server)
        .with_retry(3, 1)
        .create_product_from_draft(&draft())
        .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Session lifecycle and DestinationSink mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closed_session_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = test_session(&server);
    session.close_session();
    session.close_session();

    let err = session
        .product_variants(7)
        .await
        .expect_err("closed session should refuse calls");
    assert!(matches!(err, ShopifyError::SessionClosed));
}

#[tokio::test]
async fn sink_wraps_write_failures_as_operation_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/products.json")))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "errors": { "title": ["can't be blank"] } })),
        )
        .mount(&server)
        .await;

    let err = test_session(&server)
        .create_product(&draft())
        .await
        .expect_err("422 should fail");
    match err {
        SyncError::OperationFailure { target, message } => {
            assert_eq!(target, "product TSR-041");
            assert!(message.contains("422"), "message was: {message}");
            assert!(message.contains("can't be blank"), "message was: {message}");
        }
        other => panic!("expected OperationFailure, got: {other:?}"),
    }
}

#[tokio::test]
async fn sink_maps_read_failures_by_layer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/products/7.json")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/graphql.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Internal error" }]
        })))
        .mount(&server)
        .await;

    let session = test_session(&server);

    let read_err = session
        .get_variants_for_product(7)
        .await
        .expect_err("500 should fail");
    assert!(matches!(read_err, SyncError::Transport(_)), "got: {read_err:?}");

    let lookup_err = session
        .find_variant_by_sku("TSR-041-PLATA")
        .await
        .expect_err("GraphQL error should fail");
    assert!(matches!(lookup_err, SyncError::Api(_)), "got: {lookup_err:?}");
}

#[tokio::test]
async fn sink_update_price_targets_variant() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API}/variants/12.json")))
        .respond_with(ResponseTemplate::new(422).set_body_string("price invalid"))
        .mount(&server)
        .await;

    let err = test_session(&server)
        .update_variant_price(12, Decimal::new(100, 0))
        .await
        .expect_err("422 should fail");
    assert!(
        matches!(&err, SyncError::OperationFailure { target, .. } if target == "variant 12"),
        "got: {err:?}"
    );
}
