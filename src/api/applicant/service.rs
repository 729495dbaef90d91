use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::{
    ApplicantProfileResponse, CreateApplicantProfileRequest, UpdateApplicantProfileRequest,
};
use crate::api::error::ServiceError;
use crate::db::models::ApplicantProfile;
use crate::db::Store;
use crate::security::guard;
use crate::security::role::Role;
use crate::security::token::Identity;

pub struct ApplicantService {
    store: Store,
}

impl ApplicantService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// One profile per user, enforced by the store's unique index
    pub async fn create_profile(
        &self,
        identity: &Identity,
        request: &CreateApplicantProfileRequest,
    ) -> Result<ApplicantProfileResponse, ServiceError> {
        guard::require_applicant(identity)?;

        if self.store.users.find_by_id(identity.user_id).await?.is_none() {
            return Err(ServiceError::not_found("User not found."));
        }
        if self
            .store
            .applicants
            .find_by_user(identity.user_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("Applicant profile already exists."));
        }

        let profile = ApplicantProfile {
            id: Uuid::new_v4(),
            user_id: identity.user_id,
            resume_url: request.resume_url.trim().to_string(),
            skills: request.skills.clone(),
            experience: request.experience.clone(),
            education: request.education.clone(),
        };
        profile.validate()?;
        self.store.applicants.insert(&profile).await?;

        info!("Created applicant profile for user {}", identity.user_id);
        Ok(ApplicantProfileResponse {
            message: "Applicant profile created successfully".to_string(),
            profile,
        })
    }

    /// Own profile, or any profile for employers and admins
    pub async fn get_profile(
        &self,
        identity: &Identity,
        user_id: Option<Uuid>,
    ) -> Result<ApplicantProfile, ServiceError> {
        let target = user_id.unwrap_or(identity.user_id);
        let allowed = guard::is_self_or_admin(identity, target)
            || guard::is_role(identity, Role::Employer);
        if !allowed {
            return Err(ServiceError::forbidden(
                "Forbidden: You can only view your own applicant profile.",
            ));
        }

        self.store
            .applicants
            .find_by_user(target)
            .await?
            .ok_or_else(|| ServiceError::not_found("Applicant profile not found."))
    }

    pub async fn update_profile(
        &self,
        identity: &Identity,
        user_id: Option<Uuid>,
        request: &UpdateApplicantProfileRequest,
    ) -> Result<ApplicantProfileResponse, ServiceError> {
        let target = guard::resolve_profile_target(identity, user_id)?;
        if request.is_empty() {
            return Err(ServiceError::bad_request("No profile fields provided to update."));
        }

        let mut profile = self
            .store
            .applicants
            .find_by_user(target)
            .await?
            .ok_or_else(|| ServiceError::not_found("Applicant profile not found."))?;

        request.merge_into(&mut profile);
        profile.validate()?;
        if !self.store.applicants.update(&profile).await? {
            return Err(ServiceError::not_found("Applicant profile not found."));
        }

        info!("Applicant profile of user {} updated by {}", target, identity.user_id);
        Ok(ApplicantProfileResponse {
            message: "Applicant profile updated successfully".to_string(),
            profile,
        })
    }
}
