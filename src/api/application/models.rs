use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{Application, ApplicationStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    #[validate(length(max = 500, message = "Feedback must be at most 500 characters"))]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "jobId")]
    pub job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub message: String,
    pub application: Application,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl From<Application> for StatusResponse {
    fn from(application: Application) -> Self {
        Self {
            application_id: application.id,
            job_id: application.job_id,
            status: application.status,
            feedback: application.feedback,
        }
    }
}
