/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the identity the API layer needs to
/// authorize a request without another store lookup: user id, role, and —
/// when the account has a trainer or trainee profile — the profile id plus a
/// boolean flag for each.
///
/// # Token Types
///
/// - **Access**: 24 hours, used for API authentication
/// - **Refresh**: 30 days, exchanged for new access tokens
///
/// # Example
///
/// ```
/// use gestforma_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use gestforma_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(7, Role::Formador, Some(3), None, TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, 7);
/// assert!(validated.is_formador);
/// # Ok(())
/// # }
/// ```
use crate::models::user::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "gestforma";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }
}

/// JWT claims.
///
/// `sub` is the user id. `formador_id`/`formando_id` and their flags are set
/// at login when the account owns the corresponding profile; downstream
/// authorization reads them straight from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Issuer - always "gestforma"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Account role
    pub role: Role,

    /// Trainer profile id, when the user has one
    pub formador_id: Option<i64>,

    /// Trainee profile id, when the user has one
    pub formando_id: Option<i64>,

    pub is_formador: bool,
    pub is_formando: bool,

    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims with the default expiration for the token type.
    pub fn new(
        user_id: i64,
        role: Role,
        formador_id: Option<i64>,
        formando_id: Option<i64>,
        token_type: TokenType,
    ) -> Self {
        Self::with_expiration(
            user_id,
            role,
            formador_id,
            formando_id,
            token_type,
            token_type.default_expiration(),
        )
    }

    /// Creates claims with a custom expiration.
    pub fn with_expiration(
        user_id: i64,
        role: Role,
        formador_id: Option<i64>,
        formando_id: Option<i64>,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            role,
            formador_id,
            formando_id,
            is_formador: formador_id.is_some(),
            is_formando: formando_id.is_some(),
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signed access + refresh token pair returned by login/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Creates a JWT from claims, signed with HS256.
///
/// The secret should be at least 32 bytes and come from the environment.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues the access/refresh pair for a user.
pub fn create_token_pair(
    user_id: i64,
    role: Role,
    formador_id: Option<i64>,
    formando_id: Option<i64>,
    secret: &str,
) -> Result<TokenPair, JwtError> {
    let access = Claims::new(user_id, role, formador_id, formando_id, TokenType::Access);
    let refresh = Claims::new(user_id, role, formador_id, formando_id, TokenType::Refresh);

    Ok(TokenPair {
        access_token: create_token(&access, secret)?,
        refresh_token: create_token(&refresh, secret)?,
    })
}

/// Validates signature, expiry, nbf, and issuer, returning the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and requires it to be an access token.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates a token and requires it to be a refresh token.
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// Exchanges a valid refresh token for a new access token carrying the same
/// identity claims.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(
        refresh_claims.sub,
        refresh_claims.role,
        refresh_claims.formador_id,
        refresh_claims.formando_id,
        TokenType::Access,
    );

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_carry_profile_flags() {
        let claims = Claims::new(7, Role::Formador, Some(3), None, TokenType::Access);
        assert!(claims.is_formador);
        assert!(!claims.is_formando);
        assert_eq!(claims.formador_id, Some(3));
        assert_eq!(claims.iss, "gestforma");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(7, Role::Formando, None, Some(12), TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 7);
        assert_eq!(validated.role, Role::Formando);
        assert_eq!(validated.formando_id, Some(12));
        assert!(validated.is_formando);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, Role::Admin, None, None, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();
        assert!(validate_token(&token, "different-secret-also-32-bytes!!").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            1,
            Role::Admin,
            None,
            None,
            TokenType::Access,
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_access_refresh_type_checks() {
        let access = create_token(
            &Claims::new(1, Role::Admin, None, None, TokenType::Access),
            SECRET,
        )
        .unwrap();
        let refresh = create_token(
            &Claims::new(1, Role::Admin, None, None, TokenType::Refresh),
            SECRET,
        )
        .unwrap();

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_access_token(&refresh, SECRET).is_err());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(validate_refresh_token(&access, SECRET).is_err());
    }

    #[test]
    fn test_refresh_access_token_keeps_identity() {
        let pair = create_token_pair(9, Role::Formador, Some(4), None, SECRET).unwrap();

        let new_access = refresh_access_token(&pair.refresh_token, SECRET).unwrap();
        let validated = validate_access_token(&new_access, SECRET).unwrap();
        assert_eq!(validated.sub, 9);
        assert_eq!(validated.role, Role::Formador);
        assert_eq!(validated.formador_id, Some(4));
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let pair = create_token_pair(9, Role::Admin, None, None, SECRET).unwrap();
        assert!(refresh_access_token(&pair.access_token, SECRET).is_err());
    }
}
