#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test::TestRequest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use job_board::config::OAuthConfig;
use job_board::security::Role;

fn provider(server: &MockServer) -> OAuthConfig {
    OAuthConfig {
        client_id: "client-abc".to_string(),
        client_secret: "client-secret".to_string(),
        callback_url: None,
        token_url: format!("{}/login/oauth/access_token", server.uri()),
        api_url: server.uri(),
        ..OAuthConfig::default()
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_partial_json(json!({"client_id": "client-abc", "code": "good-code"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_test",
            "token_type": "bearer",
            "scope": "read:user,user:email"
        })))
        .mount(server)
        .await;
}

#[actix_web::test]
async fn login_redirects_to_provider() {
    let server = MockServer::start().await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let resp = actix_web::test::call_service(&app, TestRequest::get().uri("/auth/github").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(location.starts_with("https://github.com/login/oauth/authorize?"));
    assert!(location.contains("client_id=client-abc"));
}

#[actix_web::test]
async fn callback_without_code_is_rejected() {
    let server = MockServer::start().await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    for uri in ["/auth/oauth-callback", "/auth/oauth-callback?code="] {
        let (status, body) = send!(app, TestRequest::get().uri(uri));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Authorization code not provided");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[actix_web::test]
async fn rejected_code_creates_no_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        })))
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=stale"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("The code passed is incorrect or expired."));
    assert!(state.store.users.list().await.unwrap().is_empty());
}

#[actix_web::test]
async fn first_login_creates_federated_user_and_second_reuses_it() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_eq("authorization", "Bearer gho_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 583231,
            "login": "octocat",
            "name": "The Octocat",
            "email": "Octo@GitHub.com"
        })))
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "octo@github.com");
    assert_eq!(body["user"]["userType"], "federated");
    assert_eq!(body["user"]["externalId"], "583231");

    let identity = state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(identity.role, Role::Federated);
    let user_id = identity.user_id;

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.to_string());
    assert_eq!(state.store.users.list().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn private_email_falls_back_to_verified_primary() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "login": "hubot",
            "name": null,
            "email": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "old@x.com", "primary": false, "verified": true},
            {"email": "hubot@x.com", "primary": true, "verified": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "hubot@x.com");
    assert_eq!(body["user"]["username"], "hubot");
}

#[actix_web::test]
async fn verified_email_links_existing_password_account() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "login": "ann",
            "email": "ann@x.com"
        })))
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);
    let (existing, _) = common::user_with_token(&state, "ann@x.com", Role::Applicant).await;

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], existing.id.to_string());
    assert_eq!(body["user"]["userType"], "applicant");

    let linked = state.store.users.find_by_id(existing.id).await.unwrap().unwrap();
    assert_eq!(linked.external_id.as_deref(), Some("7"));
}

#[actix_web::test]
async fn provider_outage_is_a_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to communicate with the identity provider.");
    assert!(state.store.users.list().await.unwrap().is_empty());
}

#[actix_web::test]
async fn failing_profile_lookup_is_a_bad_gateway() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let state = common::state_with_oauth(provider(&server));
    let app = test_app!(state);

    let (status, _) = send!(app, TestRequest::get().uri("/auth/oauth-callback?code=good-code"));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(state.store.users.list().await.unwrap().is_empty());
}
