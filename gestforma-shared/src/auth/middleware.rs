/// Authentication middleware for Axum
///
/// Validates JWT Bearer tokens from the `Authorization` header and inserts an
/// [`AuthContext`] into request extensions. Handlers extract it with Axum's
/// `Extension` extractor; role and profile-id claims come straight from the
/// token — no further store lookup per request.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use gestforma_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {} ({})", auth.user_id, auth.role.as_str())
/// }
///
/// let secret = "jwt-secret".to_string();
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(move |req, next| {
///         jwt_auth_middleware(secret.clone(), req, next)
///     }));
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::user::Role;

/// Authentication context added to request extensions after a token passes
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i64,

    /// Account role from the token
    pub role: Role,

    /// Trainer profile id claim, if present
    pub formador_id: Option<i64>,

    /// Trainee profile id claim, if present
    pub formando_id: Option<i64>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            formador_id: claims.formador_id,
            formando_id: claims.formando_id,
        }
    }

    /// True when the context may act on behalf of `user_id` — either it is
    /// that user, or an admin-class role.
    pub fn is_self_or_admin(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.role.is_admin_class()
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// JWT authentication middleware.
///
/// Returns 401 when the header is missing, the token is malformed, invalid,
/// or expired; otherwise forwards the request with [`AuthContext`] attached.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
