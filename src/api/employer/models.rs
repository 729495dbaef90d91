use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::EmployerProfile;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployerProfileRequest {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: String,
}

/// `jobListings` is maintained by job creation and deletion, never by clients
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployerProfileRequest {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: Option<String>,
}

impl UpdateEmployerProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
    }

    pub fn merge_into(&self, profile: &mut EmployerProfile) {
        if let Some(name) = &self.company_name {
            profile.company_name = name.trim().to_string();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployerProfileResponse {
    pub message: String,
    pub profile: EmployerProfile,
}
