use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role carried by every user account and embedded in session tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employer,
    Applicant,
    /// Account created through a third-party identity provider; has no local password
    #[serde(alias = "github")]
    Federated,
}

#[derive(Debug, Error)]
#[error("unknown value '{0}'")]
pub struct ParseEnumError(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employer => "employer",
            Role::Applicant => "applicant",
            Role::Federated => "federated",
        }
    }

    /// Roles that act as job seekers
    pub fn is_applicant(&self) -> bool {
        matches!(self, Role::Applicant | Role::Federated)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employer" => Ok(Role::Employer),
            "applicant" => Ok(Role::Applicant),
            "federated" | "github" => Ok(Role::Federated),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
