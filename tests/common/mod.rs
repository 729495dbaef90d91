#![allow(dead_code)]

use job_board::config::{Config, OAuthConfig};
use job_board::db::models::User;
use job_board::db::Store;
use job_board::routes::AppState;
use job_board::security::{Identity, PasswordHasher, Role};

pub const SECRET: &str = "integration-test-secret-0123456789";

pub fn config(oauth: OAuthConfig) -> Config {
    Config {
        database_url: None,
        host: "127.0.0.1".to_string(),
        port: 8080,
        max_payload_size: 1024 * 1024,
        max_db_connections: 1,
        log_dir: "logs".to_string(),
        jwt_secret: SECRET.to_string(),
        oauth,
        base_url: "http://localhost:8080".to_string(),
        cascade_step_retries: 0,
    }
}

pub fn state_with_oauth(oauth: OAuthConfig) -> AppState {
    AppState::new(
        Store::in_memory(),
        &config(oauth),
        PasswordHasher::with_params(4096, 1, 1),
    )
}

pub fn state() -> AppState {
    state_with_oauth(OAuthConfig::default())
}

/// Inserts a user directly and returns it with a bearer token
pub async fn user_with_token(state: &AppState, email: &str, role: Role) -> (User, String) {
    let mut user = User::new(email, role);
    user.name = Some(email.split('@').next().unwrap_or("user").to_string());
    if role != Role::Federated {
        user.password_hash = Some("unused".to_string());
    }
    state.store.users.insert(&user).await.unwrap();
    let token = state.tokens.issue(&Identity::new(user.id, user.role)).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Builds the full application over the given state
macro_rules! test_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(move |cfg| job_board::routes::configure(cfg, &state)),
        )
        .await
    }};
}

/// Sends a `TestRequest` and returns the status with the JSON body (`Null` when empty)
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = actix_web::test::read_body(resp).await;
        let json: serde_json::Value =
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }};
}
