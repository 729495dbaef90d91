use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::error;

use crate::db::Store;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn probe(store: &Store, ok: &str, failed: &str) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: ok.to_string(),
            database: store.backend_name().to_string(),
            error: None,
        }),
        Err(e) => {
            error!("{} check failed: {}", ok, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: failed.to_string(),
                database: "disconnected".to_string(),
                error: Some("Database unavailable".to_string()),
            })
        }
    }
}

/// General health check including store connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(store: web::Data<Store>) -> impl Responder {
    probe(&store, "healthy", "unhealthy").await
}

/// Readiness check endpoint
///
/// Returns 503 while the store is unreachable; the process recovers when it returns.
#[get("/ready")]
async fn readiness_check(store: web::Data<Store>) -> impl Responder {
    probe(&store, "ready", "not_ready").await
}

/// Liveness check endpoint. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
