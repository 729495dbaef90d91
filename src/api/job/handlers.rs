use actix_web::{
    delete, get, post, put,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateJobRequest, UpdateJobRequest};
use super::service::JobService;
use crate::api::error::ServiceError;
use crate::security::AuthUser;

#[post("/create")]
async fn create_job(
    user: AuthUser,
    service: Data<JobService>,
    body: Json<CreateJobRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.create_job(user.identity(), &body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[put("/{id}/edit")]
async fn edit_job(
    user: AuthUser,
    service: Data<JobService>,
    path: Path<Uuid>,
    body: Json<UpdateJobRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .edit_job(user.identity(), path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
async fn delete_job(
    user: AuthUser,
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.delete_job(user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(create_job)
            .service(edit_job)
            .service(delete_job)
            .service(list_jobs)
            .service(get_job),
    );
}
