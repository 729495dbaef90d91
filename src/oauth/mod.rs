pub mod github;
pub mod service;

pub use github::GithubClient;
pub use service::FederatedLogin;
