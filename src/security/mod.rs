pub mod guard;
pub mod password;
pub mod role;
pub mod token;

pub use guard::AuthUser;
pub use password::PasswordHasher;
pub use role::Role;
pub use token::{Identity, TokenService};
