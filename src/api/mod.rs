pub mod applicant;
pub mod application;
pub mod auth;
pub mod employer;
pub mod error;
pub mod health;
pub mod home;
pub mod job;
pub mod validation;
