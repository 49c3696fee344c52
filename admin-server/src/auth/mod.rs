//! Authentication Module
//!
//! JWT issuing/validation, request middleware, and login throttling.
//! Credential hashing itself lives on the account model (argon2).

pub mod jwt;
pub mod middleware;
pub mod throttle;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use throttle::LoginThrottle;
