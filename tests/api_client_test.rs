// Player API client against a mock HTTP server.
// Run with: cargo test --test api_client_test

use pushsync::api::{EmailPlayerRecord, FocusPayload, PlayerUpdate};
use pushsync::{ApiClient, AppConfig, ChannelProfile, PlayerApi};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api/v1/", server.uri())).unwrap()
}

#[tokio::test]
async fn test_create_email_player_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players"))
        .and(body_json(json!({
            "app_id": "app-1",
            "device_type": 11,
            "identifier": "user@example.com",
            "device_player_id": "device-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": "email-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut record = EmailPlayerRecord::new("app-1", "user@example.com");
    record.device_player_id = Some("device-1".to_string());

    let id = client(&server).await.create_email_player(&record).await.unwrap();
    assert_eq!(id.as_deref(), Some("email-1"));
}

#[tokio::test]
async fn test_create_email_player_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let record = EmailPlayerRecord::new("app-1", "user@example.com");
    let err = client(&server).await.create_email_player(&record).await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_update_player_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/players/device-1"))
        .and(body_json(json!({
            "app_id": "app-1",
            "parent_player_id": "email-1",
            "email": "user@example.com",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let update = PlayerUpdate {
        parent_player_id: Some("email-1".to_string()),
        email: Some("user@example.com".to_string()),
        ..PlayerUpdate::default()
    };
    assert!(client(&server)
        .await
        .update_player("app-1", "device-1", &update)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_update_player_rejected_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/players/device-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"errors": ["bad"]})))
        .mount(&server)
        .await;

    let ok = client(&server)
        .await
        .update_player("app-1", "device-1", &PlayerUpdate::default())
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_logout_email_posts_parent_and_hash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players/email-1/email_logout"))
        .and(body_json(json!({
            "app_id": "app-1",
            "parent_player_id": "device-1",
            "identifier_auth_hash": "hash",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let profile = ChannelProfile::new(
        Some("email-1".to_string()),
        Some("user@example.com".to_string()),
        Some("hash".to_string()),
    );
    let ok = client(&server)
        .await
        .logout_email(&AppConfig::new("app-1"), &profile, "device-1")
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn test_logout_email_unsuccessful_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players/email-1/email_logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let profile = ChannelProfile::new(Some("email-1".to_string()), None, None);
    let ok = client(&server)
        .await
        .logout_email(&AppConfig::new("app-1"), &profile, "device-1")
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_on_focus_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players/email-1/on_focus"))
        .and(body_partial_json(json!({
            "app_id": "app-1",
            "state": "ping",
            "type": 1,
            "active_time": 30,
            "device_type": 11,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .await
        .on_focus("email-1", &FocusPayload::email("app-1", 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_on_session_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/players/email-1/on_session"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let record = EmailPlayerRecord::new("app-1", "user@example.com");
    assert!(client(&server)
        .await
        .on_session("email-1", &record)
        .await
        .is_err());
}
