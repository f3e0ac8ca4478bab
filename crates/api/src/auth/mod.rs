//! Authentication module for PlanPilot

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtManager};
pub use middleware::{require_auth, AuthState, AuthUser};
pub use password::{hash_password, verify_password};
