/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new account (+ profile for trainer/trainee roles)
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
/// - `POST /v1/auth/forgot-password` - Request a password reset token
/// - `POST /v1/auth/reset-password` - Consume a reset token
use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::NaiveDate;
use gestforma_shared::{
    auth::jwt,
    models::user::Role,
    services::auth_service::{self, RegisterInput},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,

    /// Optional phone number
    pub telefone: Option<String>,

    /// Account role (defaults to Formando; only Formando/Formador are open
    /// for self-registration)
    pub role: Option<Role>,

    /// Trainer specialization (required when role is Formador)
    pub area_especializacao: Option<String>,

    /// Student number (required when role is Formando)
    pub numero_aluno: Option<String>,

    /// Trainee birth date
    pub data_nascimento: Option<NaiveDate>,
}

/// Register/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// User ID
    pub user_id: i64,

    /// Account role
    pub role: Role,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Forgot-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Registers a new account.
///
/// Self-registration is open for `Formando` and `Formador` only; the matching
/// profile is created in the same call, so `area_especializacao` or
/// `numero_aluno` must be present. Management accounts come from the seed or
/// from an existing admin.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `403 Forbidden`: management role requested on the open endpoint
/// - `409 Conflict`: email or student number already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_details)?;

    let role = req.role.unwrap_or(Role::Formando);
    if !matches!(role, Role::Formando | Role::Formador) {
        return Err(ApiError::Forbidden(
            "only formando and formador accounts can self-register".to_string(),
        ));
    }

    let (user, tokens) = auth_service::register(
        &state.db,
        state.jwt_secret(),
        RegisterInput {
            email: req.email,
            password: req.password,
            nome: req.nome,
            telefone: req.telefone,
            role,
            area_especializacao: req.area_especializacao,
            numero_aluno: req.numero_aluno,
            data_nascimento: req.data_nascimento,
        },
    )
    .await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        role: user.role,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Logs in with email and password.
///
/// # Errors
///
/// `401 Unauthorized` on unknown email, wrong password, or inactive account
/// (one shared message for all three).
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_details)?;

    let (user, tokens) =
        auth_service::login(&state.db, state.jwt_secret(), &req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        role: user.role,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Issues a password reset token for the account, if one exists.
///
/// Always answers with the same message so the endpoint cannot be used to
/// probe which emails are registered. Delivery of the token is out of band.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(validation_details)?;

    if let Some(_token) = auth_service::request_password_reset(&state.db, &req.email).await? {
        info!("Password reset token issued");
    }

    Ok(Json(MessageResponse {
        message: "If the account exists, a reset token has been issued".to_string(),
    }))
}

/// Consumes a reset token and replaces the account password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(validation_details)?;

    auth_service::reset_password(&state.db, &req.token, &req.new_password).await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
