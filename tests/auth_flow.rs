//! End-to-end sign-in against a mock backend: request a passcode, verify it,
//! then list voters with the stored bearer token.

#![cfg(not(target_arch = "wasm32"))]
#![allow(clippy::unwrap_used)]

use secrecy::ExposeSecret;
use serde_json::json;
use std::net::TcpListener;
use voterdesk::{
    app_lib::{AppConfig, ResourceClient, SessionStore, transport::ReqwestTransport},
    features::{
        auth::{
            client::AuthClient,
            flow::{AuthFlow, AuthStep, FlowError},
            guards::{Access, GuardDecision, RouteGuard},
        },
        voters::client::VoterClient,
    },
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/request-otp"))
        .and(body_json(json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Verification code sent to your email address"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({ "email": "a@b.com", "otp": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "access_token": "A", "refresh_token": "B" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/voters"))
        .and(header("Authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "voter_1",
                "email": "ada@uni.edu",
                "gender": "F",
                "full_name": "Ada Lovelace",
                "department": "Computer Science",
                "created_at": "2024-05-01T10:00:00Z",
                "matriculation_number": "CSC/001"
            }]
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn passcode_sign_in_then_list_voters() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = mock_backend().await;
    let config = AppConfig::with_api_base(format!("{}/api", server.uri()));
    let store = SessionStore::in_memory();
    let transport = ReqwestTransport::new().unwrap();
    let auth = AuthClient::new(ResourceClient::new(transport.clone(), store.clone()), &config);
    let voters = VoterClient::new(ResourceClient::new(transport, store.clone()), &config);

    assert_eq!(
        RouteGuard::check(Access::Protected, &store),
        GuardDecision::Redirect("/authenticate")
    );

    let mut flow = AuthFlow::new();
    flow.set_email("a@b.com");
    flow.submit_email(&auth).await.unwrap();
    assert_eq!(flow.step(), AuthStep::EnteringCode);

    flow.enter_digit(0, "123456");
    let signed_in = flow.submit_code(&auth, &store).await.unwrap();
    assert_eq!(signed_in.redirect_to, "/dashboard");

    let session = store.load().unwrap();
    assert_eq!(session.access_token().expose_secret(), "A");
    assert_eq!(session.refresh_token().expose_secret(), "B");
    assert_eq!(RouteGuard::check(Access::Protected, &store), GuardDecision::Render);

    let listed = voters.list_voters().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].matriculation_number, "CSC/001");
}

#[tokio::test]
async fn expired_token_is_reported_as_unauthorized() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voters/uploads/status"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let client = VoterClient::new(
        ResourceClient::new(ReqwestTransport::new().unwrap(), store),
        &AppConfig::with_api_base(server.uri()),
    );

    let err = client.upload_statuses().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        err.to_string(),
        "Request failed (401): Given token not valid for any token type"
    );
}

#[tokio::test]
async fn failed_passcode_request_keeps_the_email_step() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/request-otp"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let auth = AuthClient::new(
        ResourceClient::new(ReqwestTransport::new().unwrap(), store),
        &AppConfig::with_api_base(server.uri()),
    );
    let mut flow = AuthFlow::new();
    flow.set_email("a@b.com");

    let err = flow.submit_email(&auth).await.unwrap_err();

    assert!(matches!(err, FlowError::Request(_)));
    assert_eq!(flow.step(), AuthStep::EnteringEmail);
    assert!(!flow.is_pending());
}
