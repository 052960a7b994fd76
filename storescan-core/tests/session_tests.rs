// Tests for the session bootstrap handshake

use serde_json::json;
use storescan_core::session::{SessionConfig, bootstrap, build_client};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> SessionConfig {
    SessionConfig {
        session_endpoint: format!("{}/session", server.uri()),
        api_root: format!("{}/valkyrie-api", server.uri()),
    }
}

#[tokio::test]
async fn bootstrap_resolves_root_storefront() {
    let server = MockServer::start().await;

    // Country code is uppercased on the wire, language is passed through.
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_string_contains("country_code=US"))
        .and(body_string_contains("language_code=en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"sessionUrl": format!("{}/kamaji/s1/", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kamaji/s1/user/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"base_url": "https://store.example/valkyrie-api/en/us/999/STORE-MSF77008-BASE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client().unwrap();
    let session = bootstrap(&client, &config_for(&server), "en", "us")
        .await
        .unwrap();

    assert_eq!(session.root_storefront, "STORE-MSF77008-BASE");
    assert_eq!(
        session.base_url,
        format!("{}/valkyrie-api/en/us/999", server.uri())
    );
}

#[tokio::test]
async fn handshake_without_session_url_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let client = build_client().unwrap();
    let err = bootstrap(&client, &config_for(&server), "en", "us")
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("session handshake"));
}

#[tokio::test]
async fn rejected_handshake_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = build_client().unwrap();
    let err = bootstrap(&client, &config_for(&server), "en", "us")
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("session handshake was rejected"));
}

#[tokio::test]
async fn stores_base_url_without_final_segment_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"sessionUrl": format!("{}/kamaji/s1/", server.uri())}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kamaji/s1/user/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"base_url": "https://store.example/valkyrie-api/en/us/999/"}
        })))
        .mount(&server)
        .await;

    let client = build_client().unwrap();
    let err = bootstrap(&client, &config_for(&server), "en", "us")
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("no storefront id"));
}
