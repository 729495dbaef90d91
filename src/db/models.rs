use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::{validate_http_url, validate_image_url, validate_not_blank};
use crate::security::role::{ParseEnumError, Role};

/// Persisted account record
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: String,
    /// Absent for federated accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[sqlx(try_from = "String")]
    #[serde(rename = "userType")]
    pub role: Role,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            username: None,
            email: email.into(),
            password_hash: None,
            role,
            external_id: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[validate(custom(function = "validate_http_url"))]
    pub resume_url: String,
    #[validate(length(min = 1, message = "At least one skill is required"))]
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: String,
    /// Denormalized cache; ownership is decided by `Job::employer_id`
    pub job_listings: Vec<Uuid>,
}

#[derive(Debug, Clone, FromRow, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Salary must be non-negative"))]
    pub salary: f64,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,
    /// User id of the owning employer
    #[serde(rename = "employer")]
    pub employer_id: Uuid,
    #[validate(custom(function = "validate_image_url"))]
    pub company_image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// Employers may skip workflow steps, but a final status never changes
    pub fn can_become(&self, next: ApplicationStatus) -> bool {
        !self.is_final() || *self == next
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ApplicationStatus::Pending),
            "Under Review" => Ok(ApplicationStatus::UnderReview),
            "Interview Scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "Accepted" => Ok(ApplicationStatus::Accepted),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            "Withdrawn" => Ok(ApplicationStatus::Withdrawn),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    /// User id of the applicant
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[validate(length(max = 500, message = "Feedback must be at most 500 characters"))]
    pub feedback: Option<String>,
}
