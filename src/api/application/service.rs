use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::models::{ApplicationResponse, StatusResponse, UpdateStatusRequest};
use crate::api::error::ServiceError;
use crate::db::models::{Application, ApplicationStatus, Job};
use crate::db::Store;
use crate::security::guard;
use crate::security::token::Identity;

/// Applications and their status workflow
pub struct ApplicationService {
    store: Store,
}

impl ApplicationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.store
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job not found."))
    }

    /// New applications always start as `Pending`
    pub async fn apply(
        &self,
        identity: &Identity,
        job_id: Uuid,
    ) -> Result<ApplicationResponse, ServiceError> {
        guard::require_applicant(identity)?;
        let job = self.load_job(job_id).await?;

        if self
            .store
            .applicants
            .find_by_user(identity.user_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found(
                "Applicant profile not found. Create a profile before applying.",
            ));
        }
        if self
            .store
            .applications
            .find_by_applicant_and_job(identity.user_id, job.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("You have already applied for this job."));
        }

        let application = Application {
            id: Uuid::new_v4(),
            applicant_id: identity.user_id,
            job_id: job.id,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            feedback: None,
        };
        self.store.applications.insert(&application).await?;

        info!(
            "Applicant {} applied for job {} (application {})",
            identity.user_id, job.id, application.id
        );
        Ok(ApplicationResponse {
            message: "Application submitted successfully".to_string(),
            application,
        })
    }

    pub async fn get_status(
        &self,
        identity: &Identity,
        job_id: Uuid,
    ) -> Result<StatusResponse, ServiceError> {
        guard::require_applicant(identity)?;
        self.store
            .applications
            .find_by_applicant_and_job(identity.user_id, job_id)
            .await?
            .map(StatusResponse::from)
            .ok_or_else(|| ServiceError::not_found("Application not found."))
    }

    pub async fn list_for_applicant(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Application>, ServiceError> {
        guard::require_applicant(identity)?;
        Ok(self
            .store
            .applications
            .list_by_applicant(identity.user_id)
            .await?)
    }

    pub async fn list_for_job(
        &self,
        identity: &Identity,
        job_id: Uuid,
    ) -> Result<Vec<Application>, ServiceError> {
        let job = self.load_job(job_id).await?;
        guard::require_owner_or_admin(
            identity,
            job.employer_id,
            "Forbidden: You can only view applications for your own jobs.",
        )?;
        Ok(self.store.applications.list_by_job(job.id).await?)
    }

    /// Only the employer owning the job may move an application;
    /// a final status never changes again
    pub async fn update_status(
        &self,
        identity: &Identity,
        application_id: Uuid,
        request: &UpdateStatusRequest,
    ) -> Result<ApplicationResponse, ServiceError> {
        let mut application = self
            .store
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Application not found."))?;
        let job = self.load_job(application.job_id).await?;
        guard::require_owner(
            identity,
            job.employer_id,
            "Forbidden: You can only update applications for your own jobs.",
        )?;

        if !application.status.can_become(request.status) {
            warn!(
                "Rejected status change {} -> {} on application {}",
                application.status, request.status, application.id
            );
            return Err(ServiceError::conflict(format!(
                "Application is already {} and its status can no longer change.",
                application.status
            )));
        }

        let previous = application.status;
        application.status = request.status;
        if let Some(feedback) = &request.feedback {
            application.feedback = Some(feedback.clone());
        }
        application.validate()?;

        if !self.store.applications.update(&application).await? {
            return Err(ServiceError::not_found("Application not found."));
        }

        info!(
            "Application {} moved from {} to {} by employer {}",
            application.id, previous, application.status, identity.user_id
        );
        Ok(ApplicationResponse {
            message: "Application status updated successfully".to_string(),
            application,
        })
    }
}
