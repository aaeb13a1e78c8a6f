//! Integration tests for ForecastClient retry behavior using wiremock.

use std::time::Duration;

use windwatch_ingest::{ForecastClient, RetryPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload_json() -> serde_json::Value {
    serde_json::json!({
        "weather": [
            {
                "date": "2026-08-24",
                "hourly": [
                    {"time": "900", "windspeedMiles": "12"},
                    {"time": "1200", "windspeedMiles": "21"}
                ]
            }
        ]
    })
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        retry_delay: Duration::from_millis(5),
    }
}

fn client(server: &MockServer, max_attempts: u32) -> ForecastClient {
    ForecastClient::new(
        format!("{}/forecast", server.uri()),
        Duration::from_secs(5),
        fast_policy(max_attempts),
    )
    .unwrap()
}

#[tokio::test]
async fn test_first_attempt_success_single_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .mount(&server)
        .await;

    let (payload, attempts) = client(&server, 5).fetch().await;

    let payload = payload.unwrap();
    assert_eq!(payload.weather.len(), 1);

    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].success);
    assert_eq!(attempts[0].attempt_number, 1);
    assert_eq!(attempts[0].status_code, Some(200));
    assert!(attempts[0].error.is_none());
}

#[tokio::test]
async fn test_server_errors_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .mount(&server)
        .await;

    let (payload, attempts) = client(&server, 5).fetch().await;

    assert!(payload.is_some());
    assert_eq!(attempts.len(), 3);

    // Exactly one success, and it is the last record in the batch.
    assert!(attempts[..2].iter().all(|a| !a.success));
    assert!(attempts[2].success);
    assert_eq!(attempts[0].status_code, Some(500));
    assert!(attempts[0].error.as_deref().unwrap().contains("500"));
    assert_eq!(
        attempts.iter().map(|a| a.attempt_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_budget_exhausted_returns_none_with_full_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (payload, attempts) = client(&server, 4).fetch().await;

    assert!(payload.is_none());
    assert_eq!(attempts.len(), 4);
    assert!(attempts.iter().all(|a| !a.success));
    assert!(attempts.iter().all(|a| a.status_code == Some(503)));
}

#[tokio::test]
async fn test_timeout_recorded_as_timed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload_json())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = ForecastClient::new(
        format!("{}/forecast", server.uri()),
        Duration::from_millis(50),
        fast_policy(2),
    )
    .unwrap();

    let (payload, attempts) = client.fetch().await;

    assert!(payload.is_none());
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|a| !a.success));
    assert_eq!(attempts[0].error.as_deref(), Some("timed out"));
    assert!(attempts[0].status_code.is_none());
}

#[tokio::test]
async fn test_undecodable_body_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .mount(&server)
        .await;

    let (payload, attempts) = client(&server, 3).fetch().await;

    assert!(payload.is_some());
    assert_eq!(attempts.len(), 2);
    assert!(!attempts[0].success);
    assert_eq!(attempts[0].status_code, Some(200));
    assert!(attempts[0].error.as_deref().unwrap().contains("undecodable"));
    assert!(attempts[1].success);
}
