//! Client tests.
//!
//! Retry and rate limiting behavior of the shared client over a mock
//! transport.

use meraki_health_check::api::{Method, RateLimiter, RetryPolicy};
use meraki_health_check::Severity;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

use crate::mocks::MockTransport;

#[tokio::test(start_paused = true)]
async fn test_failing_endpoint_is_attempted_three_times() {
    let mock = MockTransport::new();
    mock.fail("organizations/1/admins", 500, "internal error");
    let client = mock.client_with(
        RateLimiter::new(10, Duration::from_secs(1)),
        RetryPolicy {
            max_retries: 3,
            retry_interval: Duration::from_secs(1),
        },
    );
    let start = Instant::now();

    let err = client
        .request(Method::GET, "organizations/1/admins", &[])
        .await
        .unwrap_err();

    assert_eq!(mock.call_count("organizations/1/admins"), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert_eq!(err.severity, Severity::High);
    assert_eq!(err.category, "API Error");
    assert_eq!(
        err.message,
        "API request failed after 3 attempts: HTTP 500: internal error"
    );
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy() {
    let mock = MockTransport::new();
    mock.fail("organizations/1/admins", 429, "rate limited");
    let client = mock.client_with(
        RateLimiter::new(10, Duration::from_secs(1)),
        RetryPolicy {
            max_retries: 1,
            retry_interval: Duration::from_secs(1),
        },
    );

    let err = client
        .request(Method::GET, "organizations/1/admins", &[])
        .await
        .unwrap_err();

    assert_eq!(mock.call_count("organizations/1/admins"), 1);
    assert!(err.message.starts_with("API request failed after 1 attempts"));
}

#[tokio::test(start_paused = true)]
async fn test_successful_response_is_returned_as_json() {
    let mock = MockTransport::new();
    mock.respond("organizations/1/networks", json!([{"id": "N_1", "name": "HQ"}]));
    let client = mock.client();

    let value = client
        .request(Method::GET, "organizations/1/networks", &[("perPage", "100")])
        .await
        .unwrap();

    assert_eq!(value, json!([{"id": "N_1", "name": "HQ"}]));
    assert_eq!(mock.calls(), vec!["organizations/1/networks"]);
}

#[tokio::test(start_paused = true)]
async fn test_requests_are_paced_by_rate_limit() {
    let mock = MockTransport::new();
    mock.respond("organizations/1/networks", json!([]));
    let client = mock.client_with(
        RateLimiter::new(5, Duration::from_secs(1)),
        RetryPolicy::default(),
    );
    let start = Instant::now();

    for _ in 0..10 {
        client
            .request(Method::GET, "organizations/1/networks", &[])
            .await
            .unwrap();
    }

    // Five from the initial burst, five more at 200ms each.
    assert_eq!(mock.call_count("organizations/1/networks"), 10);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(990), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(1100), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_typed_getter_decodes_models() {
    let mock = MockTransport::new();
    mock.respond(
        "organizations/1/networks",
        json!([
            {"id": "N_1", "name": "HQ", "productTypes": ["appliance", "switch"]},
            {"id": "N_2", "name": "Lab", "productTypes": ["wireless"]}
        ]),
    );
    let client = mock.client();

    let networks = client.organization_networks("1").await.unwrap();

    assert_eq!(networks.len(), 2);
    assert!(networks[0].has_product("switch"));
    assert!(!networks[1].has_product("switch"));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_path_exhausts_retries_with_404() {
    let mock = MockTransport::new();
    let client = mock.client();

    let err = client.switch_stp("N_9").await.unwrap_err();

    assert_eq!(mock.call_count("networks/N_9/switch/stp"), 3);
    assert!(err.message.contains("HTTP 404"));
}
