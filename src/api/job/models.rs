use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::validation::{validate_image_url, validate_not_blank, DEFAULT_COMPANY_IMAGE};
use crate::db::models::{Job, User};

/// An empty image is treated like an absent one and replaced by the default
fn validate_company_image(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Ok(())
    } else {
        validate_image_url(value)
    }
}

pub fn company_image_or_default(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_COMPANY_IMAGE)
        .to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Salary must be non-negative"))]
    pub salary: f64,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,
    #[validate(custom(function = "validate_company_image"))]
    pub company_image: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Salary must be non-negative"))]
    pub salary: Option<f64>,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_company_image"))]
    pub company_image: Option<String>,
}

impl UpdateJobRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.salary.is_none()
            && self.location.is_none()
            && self.company_image.is_none()
    }

    pub fn merge_into(&self, job: &mut Job) {
        if let Some(title) = &self.title {
            job.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            job.description = description.trim().to_string();
        }
        if let Some(salary) = self.salary {
            job.salary = salary;
        }
        if let Some(location) = &self.location {
            job.location = location.trim().to_string();
        }
        if self.company_image.is_some() {
            job.company_image = company_image_or_default(self.company_image.as_deref());
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl From<&User> for EmployerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Employer reference, expanded when the employer account still exists
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EmployerRef {
    Summary(EmployerSummary),
    Id(Uuid),
}

/// Public representation of a job
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: f64,
    pub location: String,
    pub employer: EmployerRef,
    pub company_image: String,
    pub created_at: DateTime<Utc>,
}

impl JobView {
    pub fn new(job: Job, employer: Option<&User>) -> Self {
        let employer = match employer {
            Some(user) => EmployerRef::Summary(user.into()),
            None => EmployerRef::Id(job.employer_id),
        };
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            salary: job.salary,
            location: job.location,
            employer,
            company_image: job.company_image,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
