//! Integration tests for NotifySender using wiremock.

use windwatch_alert::{synthesize, Boundary, NotifyError, NotifySender, WindWindow};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> windwatch_alert::AlertPayload {
    let window = WindWindow {
        start: 1000,
        end: 1100,
        last_checked: 1200,
        max_speed: 20,
        matched: vec![],
        boundary: Boundary::Bounded,
    };
    synthesize(&window, chrono::NaiveDate::from_ymd_opt(2026, 8, 24).unwrap())
}

#[tokio::test]
async fn test_send_posts_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sendMessage"))
        .and(body_partial_json(serde_json::json!({
            "userId": "user-1",
            "payload": {
                "title": "Batten Down the Decorations!",
                "body": "High winds expected from 10:00 to 11:00, with gusts up to 20mph.",
                "data": {
                    "startHour": "10:00",
                    "endHour": "11:00",
                    "date": "2026-08-24"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = NotifySender::new(format!("{}/sendMessage", server.uri()), "user-1").unwrap();
    sender.send(&payload()).await.unwrap();
}

#[tokio::test]
async fn test_non_2xx_is_delivery_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sendMessage"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sender = NotifySender::new(format!("{}/sendMessage", server.uri()), "user-1").unwrap();
    let err = sender.send(&payload()).await.unwrap_err();
    assert!(matches!(err, NotifyError::Rejected(500)));
}

#[tokio::test]
async fn test_unreachable_sender_is_network_error() {
    // Nothing listening on this port.
    let sender = NotifySender::new("http://127.0.0.1:9/sendMessage", "user-1").unwrap();
    let err = sender.send(&payload()).await.unwrap_err();
    assert!(matches!(err, NotifyError::Network(_)));
}
