use actix_web::{
    get, post, put,
    web::{self, scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateEmployerProfileRequest, UpdateEmployerProfileRequest};
use super::service::EmployerService;
use crate::api::application::handlers::{list_for_job, update_status};
use crate::api::error::ServiceError;
use crate::api::job::models::CreateJobRequest;
use crate::api::job::JobService;
use crate::security::AuthUser;

#[post("/profile")]
async fn create_profile(
    user: AuthUser,
    service: Data<EmployerService>,
    body: Json<CreateEmployerProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.create_profile(user.identity(), &body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/profile")]
async fn get_own_profile(
    user: AuthUser,
    service: Data<EmployerService>,
) -> Result<HttpResponse, ServiceError> {
    let profile = service.get_profile(user.identity(), None).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/profile/{id}")]
async fn get_profile(
    user: AuthUser,
    service: Data<EmployerService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let profile = service
        .get_profile(user.identity(), Some(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
async fn update_own_profile(
    user: AuthUser,
    service: Data<EmployerService>,
    body: Json<UpdateEmployerProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.update_profile(user.identity(), None, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/profile/{id}")]
async fn update_profile(
    user: AuthUser,
    service: Data<EmployerService>,
    path: Path<Uuid>,
    body: Json<UpdateEmployerProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_profile(user.identity(), Some(path.into_inner()), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/jobs")]
async fn post_job(
    user: AuthUser,
    jobs: Data<JobService>,
    body: Json<CreateJobRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = jobs.create_job(user.identity(), &body).await?;
    Ok(HttpResponse::Created().json(response))
}

pub fn employer_config(config: &mut ServiceConfig) {
    config.service(
        scope("/employers")
            .service(create_profile)
            .service(get_own_profile)
            .service(get_profile)
            .service(update_own_profile)
            .service(update_profile)
            .service(post_job)
            .route("/jobs/{job_id}/applications", web::get().to(list_for_job))
            .route(
                "/applications/{application_id}/status",
                web::put().to(update_status),
            ),
    );
}
