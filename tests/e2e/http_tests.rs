//! HTTP adapter tests against a local mock API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use ticketsafi_client::{
    ApiClient, ClientConfig, ConfirmationPoller, Error, EventCategory, HttpStatusSource,
    HttpStoreSource, HttpTicketVerifier, PollConfig, PollOutcome, RemoteStatus, ScanVerdict,
    StatusSource, TicketDetails, TicketVerifier,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    let config = ClientConfig {
        api_base_url: server.uri(),
        api_token: token.map(str::to_string),
        ..ClientConfig::default()
    };
    ApiClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn test_status_source_decodes_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/REF123/"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "attendee_name": "Amina Njeri",
            "tier_name": "VIP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpStatusSource::new(api_for(&server, Some("t0ken")));
    let report = source.check_status("REF123").await.expect("should succeed");

    assert_eq!(report.status, RemoteStatus::Completed);
    assert_eq!(report.detail("tier_name"), Some(&json!("VIP")));
}

#[tokio::test]
async fn test_status_source_non_success_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/REF123/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let source = HttpStatusSource::new(api_for(&server, None));
    let err = source.check_status("REF123").await.unwrap_err();

    assert!(matches!(err, Error::UnexpectedStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_status_source_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/REF123/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = HttpStatusSource::new(api_for(&server, None));
    let err = source.check_status("REF123").await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_status_source_keeps_reference_in_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/REF%3Fx=1%23y/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/..%2F..%2Fadmin/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let source = HttpStatusSource::new(api_for(&server, Some("t0ken")));

    let report = source.check_status("REF?x=1#y").await.expect("should succeed");
    assert_eq!(report.status, RemoteStatus::Pending);
    let report = source.check_status("../../admin").await.expect("should succeed");
    assert_eq!(report.status, RemoteStatus::Pending);
}

#[tokio::test]
async fn test_status_source_rejects_dot_segment_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let source = HttpStatusSource::new(api_for(&server, Some("t0ken")));
    for reference in ["", ".", ".."] {
        let err = source.check_status(reference).await.unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }), "{reference:?}");
    }
}

#[tokio::test]
async fn test_poller_over_http_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pay/verify/REF999/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "FAILED", "reason": "insufficient funds" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let policy = PollConfig {
        interval_ms: 10,
        max_attempts: 3,
    };
    let poller = ConfirmationPoller::new(HttpStatusSource::new(api_for(&server, None)), policy);
    let completion = poller.confirm("REF999").await.expect("should complete");

    match completion.outcome {
        PollOutcome::Failed { payload } => {
            assert_eq!(payload.detail("reason"), Some(&json!("insufficient funds")));
        }
        other => unreachable!("expected failure, got {other:?}"),
    }
    assert_eq!(completion.attempts, 1);
}

#[tokio::test]
async fn test_ticket_verifier_valid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scanner/verify/"))
        .and(body_json(json!({ "qr_hash": "abc123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attendee_name": "Otieno",
            "tier_name": "Early Bird",
            "event": "Nairobi Jazz Night"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = HttpTicketVerifier::new(api_for(&server, None));
    let verdict = verifier.verify("abc123").await.expect("should succeed");

    match verdict {
        ScanVerdict::Valid(details) => {
            assert_eq!(details.display_name(), "Otieno");
            assert_eq!(details.tier_name.as_deref(), Some("Early Bird"));
            assert_eq!(details.extra.get("event"), Some(&json!("Nairobi Jazz Night")));
        }
        other => unreachable!("expected valid ticket, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ticket_verifier_success_without_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scanner/verify/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = HttpTicketVerifier::new(api_for(&server, None));
    let verdict = verifier.verify("abc123").await.expect("should succeed");

    assert_eq!(verdict, ScanVerdict::Valid(TicketDetails::default()));
}

#[tokio::test]
async fn test_ticket_verifier_rejection_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scanner/verify/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Ticket already used" })),
        )
        .mount(&server)
        .await;

    let verifier = HttpTicketVerifier::new(api_for(&server, None));
    let verdict = verifier.verify("used-hash").await.expect("should decide");

    assert!(matches!(
        verdict,
        ScanVerdict::Rejected { ref message, .. } if message == "Ticket already used"
    ));
}

#[tokio::test]
async fn test_ticket_verifier_rejects_empty_payload_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let verifier = HttpTicketVerifier::new(api_for(&server, None));
    let err = verifier.verify("   ").await.unwrap_err();

    assert!(matches!(err, Error::Scanner(_)));
}

#[tokio::test]
async fn test_store_source_fetches_storefront() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stores/kilele-sounds/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "0d1e",
            "name": "Kilele Sounds",
            "slug": "kilele-sounds",
            "description": "Live music in Nairobi",
            "logo_image": null,
            "instagram_link": "https://instagram.com/kilele",
            "events": [{
                "id": "e1",
                "title": "Sunset Sessions",
                "start_datetime": "2026-11-28T18:00:00+03:00",
                "location_name": "Alchemist",
                "lowest_price": "1000.00",
                "category": "Concert",
                "tiers": [
                    { "id": "t1", "name": "Regular", "description": "", "price": "1000.00", "available_qty": 40 }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stores = HttpStoreSource::new(api_for(&server, None));
    let store = stores.fetch("kilele-sounds").await.expect("should succeed");

    assert_eq!(store.name, "Kilele Sounds");
    assert_eq!(store.instagram_link.as_deref(), Some("https://instagram.com/kilele"));
    assert_eq!(store.events.len(), 1);
    let event = &store.events[0];
    assert_eq!(event.category, Some(EventCategory::Concert));
    assert_eq!(event.lowest_price.as_deref(), Some("1000.00"));
    assert_eq!(event.tiers[0].available_qty, 40);
    assert_eq!(store.events_on_sale().count(), 1);
}

#[tokio::test]
async fn test_store_source_unknown_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stores/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let stores = HttpStoreSource::new(api_for(&server, None));
    let err = stores.fetch("missing").await.unwrap_err();

    match err {
        Error::UnexpectedStatus { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/api/stores/missing/"));
        }
        other => unreachable!("expected 404, got {other:?}"),
    }
    assert!(matches!(
        stores.fetch("..").await,
        Err(Error::InvalidIdentifier { .. })
    ));
}
