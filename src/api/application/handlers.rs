use actix_web::{
    get, post, put,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{StatusQuery, UpdateStatusRequest};
use super::service::ApplicationService;
use crate::api::error::ServiceError;
use crate::security::AuthUser;

#[post("/apply/{job_id}")]
async fn apply(
    user: AuthUser,
    service: Data<ApplicationService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.apply(user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/status")]
async fn get_status(
    user: AuthUser,
    service: Data<ApplicationService>,
    query: Query<StatusQuery>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.get_status(user.identity(), query.job_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/user")]
async fn list_own(
    user: AuthUser,
    service: Data<ApplicationService>,
) -> Result<HttpResponse, ServiceError> {
    let applications = service.list_for_applicant(user.identity()).await?;
    Ok(HttpResponse::Ok().json(applications))
}

/// Shared with the `/employers` scope
pub(crate) async fn list_for_job(
    user: AuthUser,
    service: Data<ApplicationService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let applications = service
        .list_for_job(user.identity(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(applications))
}

/// Shared with the `/employers` scope
pub(crate) async fn update_status(
    user: AuthUser,
    service: Data<ApplicationService>,
    path: Path<Uuid>,
    body: Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_status(user.identity(), path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/job/{job_id}")]
async fn job_applications(
    user: AuthUser,
    service: Data<ApplicationService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    list_for_job(user, service, path).await
}

#[put("/application/{application_id}/status")]
async fn application_status(
    user: AuthUser,
    service: Data<ApplicationService>,
    path: Path<Uuid>,
    body: Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    update_status(user, service, path, body).await
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/applications")
            .service(apply)
            .service(get_status)
            .service(list_own)
            .service(job_applications)
            .service(application_status),
    );
}
