use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::{
    CreateEmployerProfileRequest, EmployerProfileResponse, UpdateEmployerProfileRequest,
};
use crate::api::error::ServiceError;
use crate::db::models::EmployerProfile;
use crate::db::Store;
use crate::security::guard;
use crate::security::token::Identity;

pub struct EmployerService {
    store: Store,
}

impl EmployerService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_profile(
        &self,
        identity: &Identity,
        request: &CreateEmployerProfileRequest,
    ) -> Result<EmployerProfileResponse, ServiceError> {
        guard::require_employer(identity)?;

        if self.store.users.find_by_id(identity.user_id).await?.is_none() {
            return Err(ServiceError::not_found("User not found."));
        }
        if self
            .store
            .employers
            .find_by_user(identity.user_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("Employer profile already exists."));
        }

        // Jobs posted before the profile existed still count as listings
        let job_listings = self
            .store
            .jobs
            .list_by_employer(identity.user_id)
            .await?
            .into_iter()
            .map(|job| job.id)
            .collect();

        let profile = EmployerProfile {
            id: Uuid::new_v4(),
            user_id: identity.user_id,
            company_name: request.company_name.trim().to_string(),
            job_listings,
        };
        profile.validate()?;
        self.store.employers.insert(&profile).await?;

        info!("Created employer profile for user {}", identity.user_id);
        Ok(EmployerProfileResponse {
            message: "Employer profile created successfully".to_string(),
            profile,
        })
    }

    pub async fn get_profile(
        &self,
        identity: &Identity,
        user_id: Option<Uuid>,
    ) -> Result<EmployerProfile, ServiceError> {
        let target = user_id.unwrap_or(identity.user_id);
        guard::require_self_or_admin(identity, target)?;

        self.store
            .employers
            .find_by_user(target)
            .await?
            .ok_or_else(|| ServiceError::not_found("Employer profile not found."))
    }

    pub async fn update_profile(
        &self,
        identity: &Identity,
        user_id: Option<Uuid>,
        request: &UpdateEmployerProfileRequest,
    ) -> Result<EmployerProfileResponse, ServiceError> {
        let target = guard::resolve_profile_target(identity, user_id)?;
        if request.is_empty() {
            return Err(ServiceError::bad_request("No profile fields provided to update."));
        }

        let mut profile = self
            .store
            .employers
            .find_by_user(target)
            .await?
            .ok_or_else(|| ServiceError::not_found("Employer profile not found."))?;

        request.merge_into(&mut profile);
        profile.validate()?;
        if !self.store.employers.update(&profile).await? {
            return Err(ServiceError::not_found("Employer profile not found."));
        }

        info!("Employer profile of user {} updated by {}", target, identity.user_id);
        Ok(EmployerProfileResponse {
            message: "Employer profile updated successfully".to_string(),
            profile,
        })
    }
}
