use chrono::Utc;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::models::{
    company_image_or_default, CreateJobRequest, JobResponse, JobView, MessageResponse,
    UpdateJobRequest,
};
use crate::api::error::ServiceError;
use crate::db::models::{Job, User};
use crate::db::Store;
use crate::security::guard;
use crate::security::token::Identity;

/// Job postings; ownership is always read from `Job::employer_id`
pub struct JobService {
    store: Store,
}

impl JobService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.store
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job not found."))
    }

    /// Stamps the caller as the owning employer
    pub async fn create_job(
        &self,
        identity: &Identity,
        request: &CreateJobRequest,
    ) -> Result<JobResponse, ServiceError> {
        guard::require_employer(identity)?;
        // Tokens outlive deleted accounts; a job must never point at a missing user
        if self.store.users.find_by_id(identity.user_id).await?.is_none() {
            return Err(ServiceError::not_found("User not found."));
        }

        let job = Job {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            salary: request.salary,
            location: request.location.trim().to_string(),
            employer_id: identity.user_id,
            company_image: company_image_or_default(request.company_image.as_deref()),
            created_at: Utc::now(),
        };
        job.validate()?;

        self.store.jobs.insert(&job).await?;
        self.store
            .employers
            .add_job_listing(identity.user_id, job.id)
            .await?;

        info!("Job {} created by employer {}", job.id, identity.user_id);
        Ok(JobResponse {
            message: "Job created successfully".to_string(),
            job,
        })
    }

    pub async fn edit_job(
        &self,
        identity: &Identity,
        job_id: Uuid,
        request: &UpdateJobRequest,
    ) -> Result<JobResponse, ServiceError> {
        let mut job = self.load(job_id).await?;
        guard::require_owner(
            identity,
            job.employer_id,
            "Forbidden: You can only edit your own jobs.",
        )?;
        if request.is_empty() {
            return Err(ServiceError::bad_request("No job fields provided to update."));
        }

        request.merge_into(&mut job);
        job.validate()?;
        if !self.store.jobs.update(&job).await? {
            return Err(ServiceError::not_found("Job not found."));
        }

        info!("Job {} updated by employer {}", job.id, identity.user_id);
        Ok(JobResponse {
            message: "Job updated successfully".to_string(),
            job,
        })
    }

    /// Applications on the job are kept
    pub async fn delete_job(
        &self,
        identity: &Identity,
        job_id: Uuid,
    ) -> Result<MessageResponse, ServiceError> {
        let job = self.load(job_id).await?;
        guard::require_owner_or_admin(
            identity,
            job.employer_id,
            "Forbidden: You can only delete your own jobs.",
        )?;

        if !self.store.jobs.delete(job.id).await? {
            return Err(ServiceError::not_found("Job not found."));
        }
        self.store
            .employers
            .remove_job_listing(job.employer_id, job.id)
            .await?;

        info!("Job {} deleted by {}", job.id, identity.user_id);
        Ok(MessageResponse {
            message: "Job deleted successfully".to_string(),
        })
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobView>, ServiceError> {
        let jobs = self.store.jobs.list().await?;

        let mut employers: HashMap<Uuid, Option<User>> = HashMap::new();
        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            if !employers.contains_key(&job.employer_id) {
                let employer = self.store.users.find_by_id(job.employer_id).await?;
                employers.insert(job.employer_id, employer);
            }
            let employer = employers.get(&job.employer_id).and_then(Option::as_ref);
            views.push(JobView::new(job, employer));
        }
        Ok(views)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<JobView, ServiceError> {
        let job = self.load(job_id).await?;
        let employer = self.store.users.find_by_id(job.employer_id).await?;
        if employer.is_none() {
            warn!("Job {} references missing employer {}", job.id, job.employer_id);
        }
        Ok(JobView::new(job, employer.as_ref()))
    }
}
