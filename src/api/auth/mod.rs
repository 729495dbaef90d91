pub mod cascade;
pub mod handlers;
pub mod models;
pub mod service;

pub use cascade::AccountDeletion;
pub use service::AuthService;
