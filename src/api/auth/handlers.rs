use actix_web::{
    delete, get, http::header, post, put,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::cascade::AccountDeletion;
use super::models::{
    CallbackQuery, DeleteUserResponse, LoginRequest, RegisterRequest, UpdateUserRequest,
};
use super::service::AuthService;
use crate::api::error::ServiceError;
use crate::oauth::FederatedLogin;
use crate::security::AuthUser;

#[post("/register")]
async fn register(
    service: Data<AuthService>,
    body: Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.register(&body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
async fn login(
    service: Data<AuthService>,
    body: Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.login(&body).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/github")]
async fn github_login(oauth: Data<FederatedLogin>) -> Result<HttpResponse, ServiceError> {
    let location = oauth.authorize_url()?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[get("/oauth-callback")]
async fn oauth_callback(
    oauth: Data<FederatedLogin>,
    query: Query<CallbackQuery>,
) -> Result<HttpResponse, ServiceError> {
    let response = oauth.complete(query.code.as_deref()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/users")]
async fn list_users(
    user: AuthUser,
    service: Data<AuthService>,
) -> Result<HttpResponse, ServiceError> {
    let users = service.list_users(user.identity()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/profile/{id}")]
async fn get_user(
    user: AuthUser,
    service: Data<AuthService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let found = service.get_user(user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(found))
}

#[put("/users/{id}")]
async fn update_user(
    user: AuthUser,
    service: Data<AuthService>,
    path: Path<Uuid>,
    body: Json<UpdateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_user(user.identity(), path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn delete_account(
    user: AuthUser,
    deletion: Data<AccountDeletion>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let removed = deletion
        .delete_user(user.identity(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(DeleteUserResponse {
        message: "User and related data deleted successfully".to_string(),
        removed,
    }))
}

#[delete("/users/{id}")]
async fn delete_user(
    user: AuthUser,
    deletion: Data<AccountDeletion>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    delete_account(user, deletion, path).await
}

#[delete("/{id}")]
async fn delete_user_short(
    user: AuthUser,
    deletion: Data<AccountDeletion>,
    path: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    delete_account(user, deletion, path).await
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(
        scope("/auth")
            .service(register)
            .service(login)
            .service(github_login)
            .service(oauth_callback)
            .service(list_users)
            .service(get_user)
            .service(update_user)
            .service(delete_user)
            .service(delete_user_short),
    );
}
