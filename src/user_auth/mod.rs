//! End-user credentials: registration, login, scoped bearer tokens.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::{AuthenticatedUser, jwt_auth_middleware};
pub use service::{AuthServiceError, Claims, UserAuthService};
