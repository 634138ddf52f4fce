//! Catalog client against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use product_catalog_client::{CatalogConfig, CatalogError, ProductCatalogClient};
use special_offers_core::offer::Money;
use special_offers_runtime::RetryPolicy;
use special_offers_testing::init_test_tracing;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn products_body() -> serde_json::Value {
    serde_json::json!([
        {
            "productId": "1",
            "productName": "Basic t-shirt",
            "productDescription": "a quiet t-shirt",
            "price": { "amount": 40, "currency": "eur" }
        },
        {
            "productId": "2",
            "productName": "Fancy shirt",
            "productDescription": "a loud t-shirt",
            "price": { "amount": 50, "currency": "eur" }
        }
    ])
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(3)
        .initial_delay(Duration::from_millis(5))
        .build()
}

fn client_for(server: &MockServer, policy: RetryPolicy) -> ProductCatalogClient {
    ProductCatalogClient::new(
        CatalogConfig::default()
            .with_base_url(server.uri())
            .with_retry_policy(policy),
    )
    .unwrap()
}

/// Fails the first `failures` requests with 503, then serves the products.
/// Records when each request arrived.
struct FlakyCatalog {
    failures: usize,
    calls: AtomicUsize,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for FlakyCatalog {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            ResponseTemplate::new(503)
        } else {
            ResponseTemplate::new(200).set_body_json(products_body())
        }
    }
}

#[tokio::test]
async fn fetches_items_in_catalog_order() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("productIds", "[1,2]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, RetryPolicy::default());
    let items = client.get_shopping_cart_items(&[1, 2]).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_catalog_id, 1);
    assert_eq!(items[0].product_name, "Basic t-shirt");
    assert_eq!(items[0].description, "a quiet t-shirt");
    assert_eq!(items[0].price, Money::new("eur", 40.0));
    assert_eq!(items[1].product_catalog_id, 2);
}

#[tokio::test]
async fn recovers_after_two_failures_with_backoff() {
    init_test_tracing();
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(FlakyCatalog {
            failures: 2,
            calls: AtomicUsize::new(0),
            arrivals: Arc::clone(&arrivals),
        })
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, RetryPolicy::default());
    let items = client.get_shopping_cart_items(&[1, 2]).await.unwrap();
    assert_eq!(items.len(), 2);

    let arrivals = arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 3);
    assert!(arrivals[1] - arrivals[0] >= Duration::from_millis(100));
    assert!(arrivals[2] - arrivals[1] >= Duration::from_millis(200));
}

#[tokio::test]
async fn gives_up_after_four_attempts() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_policy());
    let error = client.get_shopping_cart_items(&[1]).await.unwrap_err();

    match error {
        CatalogError::RemoteUnavailable {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            assert_eq!(
                *last_error,
                CatalogError::UnexpectedStatus {
                    status: 503,
                    body: "down".to_string()
                }
            );
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_policy());
    let error = client.get_shopping_cart_items(&[1]).await.unwrap_err();

    assert!(matches!(error, CatalogError::DecodeFailed(_)));
}

#[tokio::test]
async fn non_numeric_product_id_is_a_decode_failure() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "productId": "one",
            "productName": "Basic t-shirt",
            "productDescription": "a quiet t-shirt",
            "price": { "amount": 40, "currency": "eur" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_policy());
    let error = client.get_shopping_cart_items(&[1]).await.unwrap_err();

    assert!(matches!(error, CatalogError::DecodeFailed(_)));
}

#[tokio::test]
async fn cancellation_during_backoff() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let slow_backoff = RetryPolicy::builder()
        .max_retries(3)
        .initial_delay(Duration::from_secs(30))
        .build();
    let client = client_for(&server, slow_backoff);
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        })
    };

    let started = Instant::now();
    let result = client
        .get_shopping_cart_items_with_cancellation(&[1], &token)
        .await;
    canceller.await.unwrap();

    assert_eq!(result, Err(CatalogError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn already_cancelled_token_sends_nothing() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_policy());
    let token = CancellationToken::new();
    token.cancel();

    let result = client
        .get_shopping_cart_items_with_cancellation(&[1, 2], &token)
        .await;

    assert_eq!(result, Err(CatalogError::Cancelled));
}

#[tokio::test]
async fn connection_refused_exhausts_retries() {
    init_test_tracing();
    // Reserve a free port, then release it so nothing is listening there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ProductCatalogClient::new(
        CatalogConfig::default()
            .with_base_url(format!("http://{addr}"))
            .with_retry_policy(fast_policy()),
    )
    .unwrap();

    let error = client.get_shopping_cart_items(&[1]).await.unwrap_err();

    match error {
        CatalogError::RemoteUnavailable {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            assert!(matches!(*last_error, CatalogError::Transport(_)));
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
}

/// Answers every request with a 200 that promises 100 bytes and sends 10.
async fn serve_truncated_bodies(listener: TcpListener, connections: Arc<AtomicUsize>) {
    loop {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        connections.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            let mut request = vec![0_u8; 4096];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n[{\"produc",
                )
                .await;
            let _ = socket.shutdown().await;
        });
    }
}

#[tokio::test]
async fn truncated_body_is_retried_as_transport_failure() {
    init_test_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let server = tokio::spawn(serve_truncated_bodies(listener, Arc::clone(&connections)));

    let client = ProductCatalogClient::new(
        CatalogConfig::default()
            .with_base_url(format!("http://{addr}"))
            .with_retry_policy(fast_policy()),
    )
    .unwrap();

    let error = client.get_shopping_cart_items(&[1]).await.unwrap_err();
    server.abort();

    match error {
        CatalogError::RemoteUnavailable {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            assert!(matches!(*last_error, CatalogError::Transport(_)));
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
    assert_eq!(connections.load(Ordering::SeqCst), 4);
}
