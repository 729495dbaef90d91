use actix_web::{
    get, post, put,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateApplicantProfileRequest, UpdateApplicantProfileRequest};
use super::service::ApplicantService;
use crate::api::error::ServiceError;
use crate::security::AuthUser;

#[post("/profile")]
async fn create_profile(
    user: AuthUser,
    service: Data<ApplicantService>,
    body: Json<CreateApplicantProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.create_profile(user.identity(), &body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/profile")]
async fn get_own_profile(
    user: AuthUser,
    service: Data<ApplicantService>,
) -> Result<HttpResponse, ServiceError> {
    let profile = service.get_profile(user.identity(), None).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/profile/{id}")]
async fn get_profile(
    user: AuthUser,
    service: Data<ApplicantService>,
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
    service: Data<ApplicantService>,
    body: Json<UpdateApplicantProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.update_profile(user.identity(), None, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/profile/{id}")]
async fn update_profile(
    user: AuthUser,
    service: Data<ApplicantService>,
    path: Path<Uuid>,
    body: Json<UpdateApplicantProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_profile(user.identity(), Some(path.into_inner()), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn applicant_config(config: &mut ServiceConfig) {
    config.service(
        scope("/applicants")
            .service(create_profile)
            .service(get_own_profile)
            .service(get_profile)
            .service(update_own_profile)
            .service(update_profile),
    );
}
