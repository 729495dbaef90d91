use actix_web::{error::InternalError, HttpResponse};
use serde::Serialize;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

pub const DEFAULT_COMPANY_IMAGE: &str = "/images/default-company.png";

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("valid regex"));

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://\S*\.(jpeg|jpg|png|gif)$").expect("valid regex")
});

pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if HTTP_URL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Must be an http(s) URL".into()))
    }
}

/// The default placeholder is accepted so stored jobs re-validate after an edit
pub fn validate_image_url(value: &str) -> Result<(), ValidationError> {
    if value == DEFAULT_COMPANY_IMAGE || IMAGE_URL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("image_url")
            .with_message("Must be an http(s) URL ending in .jpeg, .jpg, .png or .gif".into()))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

/// Length is counted after trimming, since names are stored trimmed
pub fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        Err(ValidationError::new("length").with_message("Name must be at least 2 characters".into()))
    } else {
        Ok(())
    }
}

/// Flattens validator output into `{field: {errors: [..]}}`
pub fn validation_fields(errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    for (field, errors) in errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }
    serde_json::Value::Object(fields)
}

fn bad_request(error: &str, message: &str) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        fields: Some(serde_json::json!({ "message": message })),
    };
    InternalError::from_response("", HttpResponse::BadRequest().json(body)).into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            let body = ErrorResponse {
                error: "Validation failed".to_string(),
                fields: Some(validation_fields(&validation_errors)),
            };
            InternalError::from_response("", HttpResponse::BadRequest().json(body)).into()
        }
        actix_web_validator::Error::Deserialize(de_err) => {
            let err_string = de_err.to_string();
            let message = if err_string.contains("EOF while parsing") {
                "Request body is empty. Expected JSON payload".to_string()
            } else if err_string.contains("unknown variant") {
                "Invalid enum value. Check allowed values for this field".to_string()
            } else {
                format!("Invalid JSON format: {}", err_string)
            };
            bad_request("Request validation failed", &message)
        }
        _ => bad_request("Validation failed", "Validation error"),
    })
}

pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default()
        .error_handler(|err, _req| bad_request("Invalid query string", &err.to_string()))
}

pub fn path_config() -> actix_web::web::PathConfig {
    actix_web::web::PathConfig::default()
        .error_handler(|err, _req| bad_request("Invalid path parameter", &err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_url_shape() {
        assert!(validate_http_url("https://x.com/r.pdf").is_ok());
        assert!(validate_http_url("http://example.com").is_ok());
        assert!(validate_http_url("ftp://example.com/r.pdf").is_err());
        assert!(validate_http_url("").is_err());
    }

    #[test]
    fn image_url_requires_image_extension() {
        assert!(validate_image_url("https://cdn.example.com/logo.PNG").is_ok());
        assert!(validate_image_url("http://example.com/a.jpeg").is_ok());
        assert!(validate_image_url(DEFAULT_COMPANY_IMAGE).is_ok());
        assert!(validate_image_url("https://example.com/logo.svg").is_err());
        assert!(validate_image_url("example.com/logo.png").is_err());
    }

    #[test]
    fn display_name_is_measured_trimmed() {
        assert!(validate_display_name("Ann").is_ok());
        assert!(validate_display_name("  Al ").is_ok());
        assert!(validate_display_name("  A  ").is_err());
        assert!(validate_display_name("").is_err());
    }

    #[test]
    fn blank_strings_rejected() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Remote").is_ok());
    }
}
