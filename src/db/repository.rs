//! Repository traits shared by the PostgreSQL and in-memory stores

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Application, ApplicantProfile, EmployerProfile, Job, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Emails are stored lower-cased; callers pass a normalized address
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Replaces every mutable column; returns false when the user is gone
    async fn update(&self, user: &User) -> StoreResult<bool>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    async fn insert(&self, profile: &ApplicantProfile) -> StoreResult<()>;

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<ApplicantProfile>>;

    async fn update(&self, profile: &ApplicantProfile) -> StoreResult<bool>;

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait EmployerRepository: Send + Sync {
    async fn insert(&self, profile: &EmployerProfile) -> StoreResult<()>;

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<EmployerProfile>>;

    async fn update(&self, profile: &EmployerProfile) -> StoreResult<bool>;

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64>;

    /// Appends to the denormalized listing cache; no-op without a profile
    async fn add_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()>;

    async fn remove_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: &Job) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>>;

    async fn list(&self) -> StoreResult<Vec<Job>>;

    async fn list_by_employer(&self, employer_id: Uuid) -> StoreResult<Vec<Job>>;

    async fn update(&self, job: &Job) -> StoreResult<bool>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    async fn delete_by_employer(&self, employer_id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: &Application) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Application>>;

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<Option<Application>>;

    async fn list_by_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Application>>;

    async fn list_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>>;

    async fn update(&self, application: &Application) -> StoreResult<bool>;

    async fn delete_by_applicant(&self, applicant_id: Uuid) -> StoreResult<u64>;

    async fn delete_by_jobs(&self, job_ids: &[Uuid]) -> StoreResult<u64>;
}
