use actix_web::web::{self, Data, ServiceConfig};

use crate::api::{
    applicant::{handlers::applicant_config, ApplicantService},
    application::{handlers::application_config, ApplicationService},
    auth::{handlers::auth_config, AccountDeletion, AuthService},
    employer::{handlers::employer_config, EmployerService},
    health::health_config,
    home::home_config,
    job::{handlers::job_config, JobService},
    validation,
};
use crate::config::Config;
use crate::db::Store;
use crate::oauth::{FederatedLogin, GithubClient};
use crate::security::{PasswordHasher, TokenService};

/// Services shared by every HTTP worker, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Data<Store>,
    pub tokens: Data<TokenService>,
    pub auth: Data<AuthService>,
    pub deletion: Data<AccountDeletion>,
    pub oauth: Data<FederatedLogin>,
    pub applicants: Data<ApplicantService>,
    pub employers: Data<EmployerService>,
    pub jobs: Data<JobService>,
    pub applications: Data<ApplicationService>,
    max_payload_size: usize,
}

impl AppState {
    pub fn new(store: Store, config: &Config, hasher: PasswordHasher) -> Self {
        let tokens = TokenService::new(config.jwt_secret.clone());
        let github = GithubClient::new(config.oauth.clone());

        Self {
            tokens: Data::new(tokens.clone()),
            auth: Data::new(AuthService::new(store.clone(), hasher, tokens.clone())),
            deletion: Data::new(AccountDeletion::new(
                store.clone(),
                config.cascade_step_retries,
            )),
            oauth: Data::new(FederatedLogin::new(github, store.clone(), tokens)),
            applicants: Data::new(ApplicantService::new(store.clone())),
            employers: Data::new(EmployerService::new(store.clone())),
            jobs: Data::new(JobService::new(store.clone())),
            applications: Data::new(ApplicationService::new(store.clone())),
            store: Data::new(store),
            max_payload_size: config.max_payload_size,
        }
    }
}

/// Registers shared data and every route scope
pub fn configure(cfg: &mut ServiceConfig, state: &AppState) {
    cfg.app_data(state.store.clone())
        .app_data(state.tokens.clone())
        .app_data(state.auth.clone())
        .app_data(state.deletion.clone())
        .app_data(state.oauth.clone())
        .app_data(state.applicants.clone())
        .app_data(state.employers.clone())
        .app_data(state.jobs.clone())
        .app_data(state.applications.clone())
        .app_data(web::PayloadConfig::default().limit(state.max_payload_size))
        .app_data(validation::json_config().limit(state.max_payload_size))
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .configure(home_config)
        .configure(health_config)
        .configure(auth_config)
        .configure(applicant_config)
        .configure(employer_config)
        .configure(job_config)
        .configure(application_config);
}
