//! Bearer token authentication and the endpoints for registering and logging in.

mod log_in;
mod middleware;
mod register_user;
mod token;

pub use log_in::post_log_in;
pub use middleware::{AuthError, AuthenticatedUser};
pub use register_user::{AuthResponse, AuthState, Credentials, register_user};
pub(crate) use register_user::normalize_email;
pub use token::JwtKeys;
