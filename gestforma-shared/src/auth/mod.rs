//! Authentication primitives: password hashing, JWT issuance/validation, and
//! the axum middleware that turns a Bearer token into an `AuthContext`.

pub mod jwt;
pub mod middleware;
pub mod password;
