use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use valuation_gauge::config::{Endpoint, QuoteField};
use valuation_gauge::error::QuoteError;
use valuation_gauge::model::quote::QuoteOrigin;
use valuation_gauge::quote_source::{fetch_quotes, QuoteSource};

async fn spawn_mock() -> SocketAddr {
    let app = Router::new()
        .route(
            "/markets",
            get(|| async {
                Json(json!([{
                    "current_price": "97000.5",
                    "market_cap": 1.95e12,
                    "circulating_supply": 19800000
                }]))
            }),
        )
        .route("/gold", get(|| async { Json(json!({ "price": 2650.25 })) }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "price": 1.0 }))
            }),
        )
        .route(
            "/delayed",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(600)).await;
                Json(json!({ "price": 42.0 }))
            }),
        )
        .route("/garbage", get(|| async { "<html>rate limited</html>" }))
        .route("/zero-supply", get(|| async { Json(json!({ "supply": 0 })) }))
        .route("/nan", get(|| async { Json(json!({ "price": "NaN" })) }))
        .route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Loopback requests must not be routed through an ambient HTTP proxy.
fn source(timeout_ms: u64) -> QuoteSource {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    QuoteSource::with_client(http, timeout_ms)
}

fn field(key: &str, pointer: &str, fallback: f64, positive: bool) -> QuoteField {
    QuoteField {
        key: key.to_string(),
        pointer: pointer.to_string(),
        fallback,
        positive,
    }
}

fn markets(addr: SocketAddr) -> Endpoint {
    Endpoint {
        url: format!("http://{}/markets", addr),
        fields: vec![
            field("btc_price", "/0/current_price", 98_000.0, true),
            field("btc_market_cap", "/0/market_cap", 1.94e12, true),
            field("btc_supply", "/0/circulating_supply", 19_800_000.0, true),
        ],
    }
}

fn single(addr: SocketAddr, path: &str, key: &str, pointer: &str, fallback: f64) -> Endpoint {
    Endpoint {
        url: format!("http://{}{}", addr, path),
        fields: vec![field(key, pointer, fallback, true)],
    }
}

#[tokio::test]
/// Verifies the live path:
/// string and number encodings both parse and quotes carry the endpoint host.
async fn live_batch_parses_string_and_number_quotes() {
    let addr = spawn_mock().await;
    let endpoints = vec![
        markets(addr),
        single(addr, "/gold", "gold_price", "/price", 2_600.0),
    ];

    let batch = source(2_000).fetch(&endpoints).await;

    assert!(batch.is_live());
    assert_eq!(batch.value("btc_price"), Some(97_000.5));
    assert_eq!(batch.value("btc_market_cap"), Some(1.95e12));
    assert_eq!(batch.value("btc_supply"), Some(19_800_000.0));
    assert_eq!(batch.value("gold_price"), Some(2_650.25));
    let quote = batch.get("gold_price").unwrap();
    assert_eq!(quote.source, "127.0.0.1");
    assert!(!quote.is_fallback());
}

#[tokio::test]
/// Verifies the timeout path:
/// one hanging endpoint turns the whole batch into fallbacks within the timeout.
async fn timeout_falls_back_for_whole_batch() {
    let addr = spawn_mock().await;
    let endpoints = vec![
        markets(addr),
        single(addr, "/slow", "gold_price", "/price", 2_600.0),
    ];

    let started = Instant::now();
    let batch = source(200).fetch(&endpoints).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(matches!(
        batch.origin,
        QuoteOrigin::Fallback {
            reason: QuoteError::Timeout { timeout_ms: 200, .. }
        }
    ));
    assert_eq!(batch.value("btc_price"), Some(98_000.0));
    assert_eq!(batch.value("btc_market_cap"), Some(1.94e12));
    assert_eq!(batch.value("gold_price"), Some(2_600.0));
    assert!(batch.quotes.values().all(|q| q.is_fallback()));
}

#[tokio::test]
/// Verifies malformed bodies:
/// a non-JSON response is a fallback, not an error to the caller.
async fn malformed_body_falls_back() {
    let addr = spawn_mock().await;
    let endpoints = vec![single(addr, "/garbage", "gold_price", "/price", 2_600.0)];

    let batch = source(2_000).fetch(&endpoints).await;

    assert!(matches!(
        batch.origin,
        QuoteOrigin::Fallback {
            reason: QuoteError::Json { .. }
        }
    ));
    assert_eq!(batch.value("gold_price"), Some(2_600.0));
}

#[tokio::test]
/// Verifies degenerate inputs are stopped at the source:
/// a zero supply never reaches the ratio math.
async fn zero_supply_is_degenerate() {
    let addr = spawn_mock().await;
    let endpoints = vec![
        markets(addr),
        single(addr, "/zero-supply", "gold_supply", "/supply", 1.0),
    ];

    let batch = source(2_000).fetch(&endpoints).await;

    assert!(matches!(
        batch.origin,
        QuoteOrigin::Fallback {
            reason: QuoteError::Degenerate { .. }
        }
    ));
    assert_eq!(batch.value("btc_supply"), Some(19_800_000.0));
}

#[tokio::test]
/// Verifies NaN quotes are rejected rather than propagated.
async fn nan_quote_falls_back() {
    let addr = spawn_mock().await;
    let endpoints = vec![single(addr, "/nan", "gold_price", "/price", 2_600.0)];

    let batch = source(2_000).fetch(&endpoints).await;

    assert!(matches!(
        batch.origin,
        QuoteOrigin::Fallback {
            reason: QuoteError::NonFinite { .. }
        }
    ));
    assert!(batch.value("gold_price").unwrap().is_finite());
}

#[tokio::test]
/// Verifies HTTP error statuses fall back with the status recorded.
async fn error_status_falls_back() {
    let addr = spawn_mock().await;
    let endpoints = vec![single(addr, "/down", "gold_price", "/price", 2_600.0)];

    let batch = source(2_000).fetch(&endpoints).await;

    assert!(matches!(
        batch.origin,
        QuoteOrigin::Fallback {
            reason: QuoteError::Status { status: 503, .. }
        }
    ));
}

#[tokio::test]
/// Verifies connection failures:
/// nothing listening on the port still resolves with fallbacks.
async fn unreachable_host_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoints = vec![markets(addr)];
    let batch = fetch_quotes(&endpoints, 2_000).await;

    assert!(!batch.is_live());
    assert_eq!(batch.value("btc_price"), Some(98_000.0));
}

#[tokio::test]
/// Verifies endpoints are requested concurrently:
/// two 600ms endpoints settle in well under their sequential total.
async fn endpoints_are_fetched_concurrently() {
    let addr = spawn_mock().await;
    let endpoints = vec![
        single(addr, "/delayed", "a", "/price", 1.0),
        single(addr, "/delayed", "b", "/price", 1.0),
    ];
    let started = Instant::now();
    let batch = source(5_000).fetch(&endpoints).await;

    assert!(batch.is_live());
    assert_eq!(batch.value("a"), Some(42.0));
    assert_eq!(batch.value("b"), Some(42.0));
    assert!(started.elapsed() < Duration::from_millis(1_150));
}
