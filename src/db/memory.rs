//! In-process store used by tests and `serve --in-memory`

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Application, ApplicantProfile, EmployerProfile, Job, User};
use super::repository::{
    ApplicantRepository, ApplicationRepository, EmployerRepository, JobRepository, StoreError,
    StoreResult, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    applicants: HashMap<Uuid, ApplicantProfile>,
    employers: HashMap<Uuid, EmployerProfile>,
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
}

impl Tables {
    /// Mirrors the unique indexes on `users`
    fn check_user_unique(&self, user: &User) -> StoreResult<()> {
        for other in self.users.values().filter(|u| u.id != user.id) {
            if other.email == user.email {
                return Err(StoreError::Conflict("User already exists (users_email_key)".into()));
            }
            if user.username.is_some() && other.username == user.username {
                return Err(StoreError::Conflict(
                    "User already exists (users_username_key)".into(),
                ));
            }
            if user.external_id.is_some() && other.external_id == user.external_id {
                return Err(StoreError::Conflict(
                    "User already exists (users_external_id_key)".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

fn sorted<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> i64) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.users.values().cloned(), |u| {
            u.created_at.timestamp_micros()
        }))
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Ok(false);
        }
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl ApplicantRepository for MemoryStore {
    async fn insert(&self, profile: &ApplicantProfile) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.applicants.contains_key(&profile.user_id) {
            return Err(StoreError::Conflict(
                "Applicant profile already exists (applicants_user_id_key)".into(),
            ));
        }
        tables.applicants.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<ApplicantProfile>> {
        Ok(self.tables.read().await.applicants.get(&user_id).cloned())
    }

    async fn update(&self, profile: &ApplicantProfile) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.applicants.get_mut(&profile.user_id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let removed = self.tables.write().await.applicants.remove(&user_id);
        Ok(removed.map_or(0, |_| 1))
    }
}

#[async_trait]
impl EmployerRepository for MemoryStore {
    async fn insert(&self, profile: &EmployerProfile) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.employers.contains_key(&profile.user_id) {
            return Err(StoreError::Conflict(
                "Employer profile already exists (employers_user_id_key)".into(),
            ));
        }
        tables.employers.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<EmployerProfile>> {
        Ok(self.tables.read().await.employers.get(&user_id).cloned())
    }

    async fn update(&self, profile: &EmployerProfile) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.employers.get_mut(&profile.user_id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let removed = self.tables.write().await.employers.remove(&user_id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn add_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(profile) = tables.employers.get_mut(&user_id) {
            if !profile.job_listings.contains(&job_id) {
                profile.job_listings.push(job_id);
            }
        }
        Ok(())
    }

    async fn remove_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(profile) = tables.employers.get_mut(&user_id) {
            profile.job_listings.retain(|id| *id != job_id);
        }
        Ok(())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert(&self, job: &Job) -> StoreResult<()> {
        self.tables.write().await.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.jobs.values().cloned(), |j| {
            -j.created_at.timestamp_micros()
        }))
    }

    async fn list_by_employer(&self, employer_id: Uuid) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .jobs
                .values()
                .filter(|j| j.employer_id == employer_id)
                .cloned(),
            |j| -j.created_at.timestamp_micros(),
        ))
    }

    async fn update(&self, job: &Job) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.jobs.get_mut(&job.id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.jobs.remove(&id).is_some())
    }

    async fn delete_by_employer(&self, employer_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|_, j| j.employer_id != employer_id);
        Ok((before - tables.jobs.len()) as u64)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn insert(&self, application: &Application) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.applications.values().any(|a| {
            a.applicant_id == application.applicant_id && a.job_id == application.job_id
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "Application already exists (applications_applicant_id_job_id_key)".into(),
            ));
        }
        tables.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .find(|a| a.applicant_id == applicant_id && a.job_id == job_id)
            .cloned())
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .applications
                .values()
                .filter(|a| a.applicant_id == applicant_id)
                .cloned(),
            |a| a.applied_at.timestamp_micros(),
        ))
    }

    async fn list_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .applications
                .values()
                .filter(|a| a.job_id == job_id)
                .cloned(),
            |a| a.applied_at.timestamp_micros(),
        ))
    }

    async fn update(&self, application: &Application) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.applications.get_mut(&application.id) {
            Some(existing) => {
                *existing = application.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_applicant(&self, applicant_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.applications.len();
        tables.applications.retain(|_, a| a.applicant_id != applicant_id);
        Ok((before - tables.applications.len()) as u64)
    }

    async fn delete_by_jobs(&self, job_ids: &[Uuid]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.applications.len();
        tables.applications.retain(|_, a| !job_ids.contains(&a.job_id));
        Ok((before - tables.applications.len()) as u64)
    }
}
