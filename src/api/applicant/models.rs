use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::validation::validate_http_url;
use crate::db::models::ApplicantProfile;

/// Absent fields default to empty; resume URL and skills are still required
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicantProfileRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_http_url"))]
    pub resume_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one skill is required"))]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicantProfileRequest {
    #[validate(custom(function = "validate_http_url"))]
    pub resume_url: Option<String>,
    #[validate(length(min = 1, message = "At least one skill is required"))]
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
}

impl UpdateApplicantProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.resume_url.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
            && self.education.is_none()
    }

    pub fn merge_into(&self, profile: &mut ApplicantProfile) {
        if let Some(resume_url) = &self.resume_url {
            profile.resume_url = resume_url.trim().to_string();
        }
        if let Some(skills) = &self.skills {
            profile.skills = skills.clone();
        }
        if let Some(experience) = &self.experience {
            profile.experience = experience.clone();
        }
        if let Some(education) = &self.education {
            profile.education = education.clone();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicantProfileResponse {
    pub message: String,
    pub profile: ApplicantProfile,
}
