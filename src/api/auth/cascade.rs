//! Account deletion with its dependent records
//!
//! Deletion runs as an ordered saga: profiles, then dependents, then the user
//! record itself. Every step is a "delete where" that no-ops when re-run, so a
//! request that fails halfway can simply be repeated. The user record is only
//! removed once every other step has succeeded.

use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::error::ServiceError;
use crate::db::{Store, StoreResult};
use crate::security::guard;
use crate::security::token::Identity;

/// Rows removed per collection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub profiles: u64,
    pub jobs: u64,
    pub applications: u64,
    pub users: u64,
}

pub struct AccountDeletion {
    store: Store,
    step_retries: u32,
    backoff: Duration,
}

impl AccountDeletion {
    pub fn new(store: Store, step_retries: u32) -> Self {
        Self {
            store,
            step_retries,
            backoff: Duration::from_millis(100),
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Removes the user's profiles, jobs and applications, then the user.
    ///
    /// Applications on the user's jobs are removed along with the jobs: an
    /// application never outlives the job it points at.
    pub async fn delete_user(
        &self,
        acting: &Identity,
        target: Uuid,
    ) -> Result<DeletionReport, ServiceError> {
        guard::require_self_or_admin(acting, target)?;

        let user = self
            .store
            .users
            .find_by_id(target)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found."))?;

        info!(
            "Deleting user {} ({}) requested by {}",
            user.id, user.role, acting.user_id
        );

        let store = &self.store;
        let mut report = DeletionReport::default();

        // Dependents are looked up by owner id rather than by the current role,
        // so records left over from an earlier role are removed too
        let employer_profiles = self
            .step("employer profile", target, move || async move {
                store.employers.delete_by_user(target).await
            })
            .await?;
        let job_applications = self
            .step("applications on owned jobs", target, move || async move {
                let job_ids: Vec<Uuid> = store
                    .jobs
                    .list_by_employer(target)
                    .await?
                    .into_iter()
                    .map(|job| job.id)
                    .collect();
                if job_ids.is_empty() {
                    return Ok(0);
                }
                store.applications.delete_by_jobs(&job_ids).await
            })
            .await?;
        report.jobs = self
            .step("jobs", target, move || async move {
                store.jobs.delete_by_employer(target).await
            })
            .await?;
        let applicant_profiles = self
            .step("applicant profile", target, move || async move {
                store.applicants.delete_by_user(target).await
            })
            .await?;
        let own_applications = self
            .step("applications", target, move || async move {
                store.applications.delete_by_applicant(target).await
            })
            .await?;

        report.profiles = employer_profiles + applicant_profiles;
        report.applications = job_applications + own_applications;

        report.users = self
            .step("user record", target, move || async move {
                store.users.delete(target).await.map(u64::from)
            })
            .await?;

        info!("User {} deleted: {:?}", target, report);
        Ok(report)
    }

    async fn step<F, Fut>(&self, name: &str, user_id: Uuid, op: F) -> Result<u64, ServiceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StoreResult<u64>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(removed) => {
                    debug!("Cascade step '{}' for user {} removed {}", name, user_id, removed);
                    return Ok(removed);
                }
                Err(e) if attempt < self.step_retries => {
                    attempt += 1;
                    warn!(
                        "Cascade step '{}' for user {} failed (attempt {}/{}): {}",
                        name,
                        user_id,
                        attempt,
                        self.step_retries + 1,
                        e
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(e) => {
                    error!(
                        "Cascade step '{}' for user {} failed, user record kept: {}",
                        name, user_id, e
                    );
                    return Err(e.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::db::models::{Application, ApplicationStatus, ApplicantProfile, EmployerProfile, Job, User};
    use crate::db::{ApplicationRepository, StoreError};
    use crate::security::role::Role;

    /// Fails `delete_by_applicant` a fixed number of times before delegating
    struct FlakyApplications {
        inner: Arc<dyn ApplicationRepository>,
        failures_left: AtomicU32,
    }

    #[async_trait]
    impl ApplicationRepository for FlakyApplications {
        async fn insert(&self, application: &Application) -> StoreResult<()> {
            self.inner.insert(application).await
        }

        async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Application>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_applicant_and_job(
            &self,
            applicant_id: Uuid,
            job_id: Uuid,
        ) -> StoreResult<Option<Application>> {
            self.inner.find_by_applicant_and_job(applicant_id, job_id).await
        }

        async fn list_by_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Application>> {
            self.inner.list_by_applicant(applicant_id).await
        }

        async fn list_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
            self.inner.list_by_job(job_id).await
        }

        async fn update(&self, application: &Application) -> StoreResult<bool> {
            self.inner.update(application).await
        }

        async fn delete_by_applicant(&self, applicant_id: Uuid) -> StoreResult<u64> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.delete_by_applicant(applicant_id).await
        }

        async fn delete_by_jobs(&self, job_ids: &[Uuid]) -> StoreResult<u64> {
            self.inner.delete_by_jobs(job_ids).await
        }
    }

    fn with_flaky_applications(store: &Store, failures: u32) -> Store {
        let mut flaky = store.clone();
        flaky.applications = Arc::new(FlakyApplications {
            inner: store.applications.clone(),
            failures_left: AtomicU32::new(failures),
        });
        flaky
    }

    async fn user(store: &Store, email: &str, role: Role) -> User {
        let mut user = User::new(email, role);
        user.password_hash = Some("hash".into());
        store.users.insert(&user).await.unwrap();
        user
    }

    async fn job(store: &Store, employer: Uuid) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            title: "Backend Eng".into(),
            description: "Build services".into(),
            salary: 100_000.0,
            location: "Remote".into(),
            employer_id: employer,
            company_image: crate::api::validation::DEFAULT_COMPANY_IMAGE.into(),
            created_at: Utc::now(),
        };
        store.jobs.insert(&job).await.unwrap();
        job
    }

    async fn apply(store: &Store, applicant: Uuid, job: Uuid) -> Application {
        let application = Application {
            id: Uuid::new_v4(),
            applicant_id: applicant,
            job_id: job,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            feedback: None,
        };
        store.applications.insert(&application).await.unwrap();
        application
    }

    async fn applicant_profile(store: &Store, user_id: Uuid) {
        store
            .applicants
            .insert(&ApplicantProfile {
                id: Uuid::new_v4(),
                user_id,
                resume_url: "https://x.com/r.pdf".into(),
                skills: vec!["Go".into()],
                experience: vec![],
                education: vec![],
            })
            .await
            .unwrap();
    }

    fn identity(user: &User) -> Identity {
        Identity::new(user.id, user.role)
    }

    #[tokio::test]
    async fn employer_deletion_removes_profile_jobs_and_their_applications() {
        let store = Store::in_memory();
        let employer = user(&store, "e@x.com", Role::Employer).await;
        let applicant = user(&store, "a@x.com", Role::Applicant).await;
        store
            .employers
            .insert(&EmployerProfile {
                id: Uuid::new_v4(),
                user_id: employer.id,
                company_name: "Wayne Tech".into(),
                job_listings: vec![],
            })
            .await
            .unwrap();
        let j1 = job(&store, employer.id).await;
        let j2 = job(&store, employer.id).await;
        let a1 = apply(&store, applicant.id, j1.id).await;

        let report = AccountDeletion::new(store.clone(), 0)
            .delete_user(&identity(&employer), employer.id)
            .await
            .unwrap();

        assert_eq!(
            report,
            DeletionReport {
                profiles: 1,
                jobs: 2,
                applications: 1,
                users: 1,
            }
        );
        assert!(store.users.find_by_id(employer.id).await.unwrap().is_none());
        assert!(store.employers.find_by_user(employer.id).await.unwrap().is_none());
        assert!(store.jobs.find_by_id(j1.id).await.unwrap().is_none());
        assert!(store.jobs.find_by_id(j2.id).await.unwrap().is_none());
        assert!(store.applications.find_by_id(a1.id).await.unwrap().is_none());
        assert!(store.users.find_by_id(applicant.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn applicant_deletion_removes_profile_and_applications() {
        let store = Store::in_memory();
        let employer = user(&store, "e@x.com", Role::Employer).await;
        let applicant = user(&store, "a@x.com", Role::Applicant).await;
        applicant_profile(&store, applicant.id).await;
        let j = job(&store, employer.id).await;
        let a = apply(&store, applicant.id, j.id).await;

        let admin = Identity::new(Uuid::new_v4(), Role::Admin);
        AccountDeletion::new(store.clone(), 0)
            .delete_user(&admin, applicant.id)
            .await
            .unwrap();

        assert!(store.applicants.find_by_user(applicant.id).await.unwrap().is_none());
        assert!(store.applications.find_by_id(a.id).await.unwrap().is_none());
        assert!(store.jobs.find_by_id(j.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn only_self_or_admin_may_delete() {
        let store = Store::in_memory();
        let victim = user(&store, "v@x.com", Role::Applicant).await;
        let other = user(&store, "o@x.com", Role::Employer).await;

        let err = AccountDeletion::new(store.clone(), 0)
            .delete_user(&identity(&other), victim.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(store.users.find_by_id(victim.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let store = Store::in_memory();
        let admin = Identity::new(Uuid::new_v4(), Role::Admin);
        let err = AccountDeletion::new(store, 0)
            .delete_user(&admin, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn transient_step_failure_is_retried() {
        let store = Store::in_memory();
        let applicant = user(&store, "a@x.com", Role::Applicant).await;
        applicant_profile(&store, applicant.id).await;

        let flaky = with_flaky_applications(&store, 2);
        AccountDeletion::new(flaky, 2)
            .with_backoff(Duration::from_millis(1))
            .delete_user(&identity(&applicant), applicant.id)
            .await
            .unwrap();

        assert!(store.users.find_by_id(applicant.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exhausted_retries_keep_user_and_a_repeat_resumes() {
        let store = Store::in_memory();
        let employer = user(&store, "e@x.com", Role::Employer).await;
        let applicant = user(&store, "a@x.com", Role::Applicant).await;
        applicant_profile(&store, applicant.id).await;
        let j = job(&store, employer.id).await;
        let a = apply(&store, applicant.id, j.id).await;

        let flaky = with_flaky_applications(&store, 5);
        let err = AccountDeletion::new(flaky, 1)
            .with_backoff(Duration::from_millis(1))
            .delete_user(&identity(&applicant), applicant.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));

        // Profile step already ran; the user record and application survive
        assert!(store.applicants.find_by_user(applicant.id).await.unwrap().is_none());
        assert!(store.users.find_by_id(applicant.id).await.unwrap().is_some());
        assert!(store.applications.find_by_id(a.id).await.unwrap().is_some());

        let report = AccountDeletion::new(store.clone(), 0)
            .delete_user(&identity(&applicant), applicant.id)
            .await
            .unwrap();
        assert_eq!(report.profiles, 0);
        assert_eq!(report.applications, 1);
        assert!(store.users.find_by_id(applicant.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn records_from_a_previous_role_are_removed() {
        let store = Store::in_memory();
        let applicant = user(&store, "a@x.com", Role::Applicant).await;
        // Former employer, moved to applicant by an admin
        let switched = user(&store, "e@x.com", Role::Applicant).await;
        store
            .employers
            .insert(&EmployerProfile {
                id: Uuid::new_v4(),
                user_id: switched.id,
                company_name: "Wayne Tech".into(),
                job_listings: vec![],
            })
            .await
            .unwrap();
        let j = job(&store, switched.id).await;
        let a = apply(&store, applicant.id, j.id).await;
        applicant_profile(&store, switched.id).await;

        let admin = Identity::new(Uuid::new_v4(), Role::Admin);
        let report = AccountDeletion::new(store.clone(), 0)
            .delete_user(&admin, switched.id)
            .await
            .unwrap();

        assert_eq!(
            report,
            DeletionReport {
                profiles: 2,
                jobs: 1,
                applications: 1,
                users: 1,
            }
        );
        assert!(store.employers.find_by_user(switched.id).await.unwrap().is_none());
        assert!(store.applicants.find_by_user(switched.id).await.unwrap().is_none());
        assert!(store.jobs.find_by_id(j.id).await.unwrap().is_none());
        assert!(store.applications.find_by_id(a.id).await.unwrap().is_none());
    }
}
