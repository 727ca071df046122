/// Authentication service
///
/// Registration, login, and password-reset flows. Issues the JWT pair whose
/// claims carry role and profile ids so the API layer can authorize requests
/// without another store lookup. Plaintext passwords exist only transiently
/// in these functions and are never logged.
use crate::{
    auth::{
        jwt::{create_token_pair, TokenPair},
        password::{hash_password, verify_password},
    },
    error::{DomainError, DomainResult},
    models::{
        formador::{CreateFormador, Formador},
        formando::{CreateFormando, Formando},
        user::{CreateUser, Role, User},
    },
};
use chrono::{Duration, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// Registration input. Profile fields are required when the role calls for
/// the matching profile.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub nome: String,
    pub telefone: Option<String>,
    pub role: Role,

    /// Required when role is Formador
    pub area_especializacao: Option<String>,

    /// Required when role is Formando
    pub numero_aluno: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
}

/// Registers a new account and, for trainer/trainee roles, its profile.
///
/// The user row and its profile commit in one transaction: a failed profile
/// insert (duplicate student number, missing field) leaves no orphan account
/// behind and the email stays free for a corrected retry.
///
/// # Errors
///
/// - `Validation` on malformed email, short password, or missing profile data
/// - `Conflict` on duplicate email or duplicate student number
pub async fn register(
    pool: &SqlitePool,
    jwt_secret: &str,
    input: RegisterInput,
) -> DomainResult<(User, TokenPair)> {
    if !input.email.contains('@') {
        return Err(DomainError::Validation("invalid email address".into()));
    }
    if input.password.len() < 8 {
        return Err(DomainError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    if input.nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }

    if User::find_by_email(pool, &input.email).await?.is_some() {
        return Err(DomainError::Conflict(format!(
            "email {} is already registered",
            input.email.to_lowercase()
        )));
    }

    let password_hash =
        hash_password(&input.password).map_err(|e| DomainError::Validation(e.to_string()))?;

    let mut tx = pool.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            email: input.email,
            password_hash,
            role: input.role,
            nome: input.nome,
            telefone: input.telefone,
        },
    )
    .await
    .map_err(|e| DomainError::from_sqlx(e, "email is already registered"))?;

    // Role-specific profile, created together with the user.
    let mut formador_id = None;
    let mut formando_id = None;

    match input.role {
        Role::Formador => {
            let area = input.area_especializacao.ok_or_else(|| {
                DomainError::Validation("area_especializacao is required for a formador".into())
            })?;
            let formador = Formador::create(
                &mut *tx,
                CreateFormador {
                    user_id: user.id,
                    area_especializacao: area,
                    cor_calendario: None,
                },
            )
            .await
            .map_err(|e| DomainError::from_sqlx(e, "user already has a trainer profile"))?;
            formador_id = Some(formador.id);
        }
        Role::Formando => {
            let numero = input.numero_aluno.ok_or_else(|| {
                DomainError::Validation("numero_aluno is required for a formando".into())
            })?;
            let formando = Formando::create(
                &mut *tx,
                CreateFormando {
                    user_id: user.id,
                    numero_aluno: numero,
                    data_nascimento: input.data_nascimento,
                },
            )
            .await
            .map_err(|e| {
                DomainError::from_sqlx(e, "student number is already taken")
            })?;
            formando_id = Some(formando.id);
        }
        _ => {}
    }

    tx.commit().await?;

    let tokens = create_token_pair(user.id, user.role, formador_id, formando_id, jwt_secret)
        .map_err(|e| DomainError::Authentication(e.to_string()))?;

    info!(user_id = user.id, role = user.role.as_str(), "User registered");
    Ok((user, tokens))
}

/// Authenticates by email + password and issues the token pair.
///
/// # Errors
///
/// `Authentication` on unknown email, wrong password, or inactive account.
/// The three cases share one message so callers cannot probe which emails
/// exist.
pub async fn login(
    pool: &SqlitePool,
    jwt_secret: &str,
    email: &str,
    password: &str,
) -> DomainResult<(User, TokenPair)> {
    let user = User::find_by_email(pool, email)
        .await?
        .ok_or_else(|| DomainError::Authentication("invalid credentials".into()))?;

    let matches = verify_password(password, &user.password_hash)
        .map_err(|e| DomainError::Authentication(e.to_string()))?;
    if !matches {
        debug!(user_id = user.id, "Password mismatch");
        return Err(DomainError::Authentication("invalid credentials".into()));
    }

    if !user.ativo {
        warn!(user_id = user.id, "Login attempt on inactive account");
        return Err(DomainError::Authentication("invalid credentials".into()));
    }

    // Profile ids become token claims; looked up once here, not per request.
    let formador_id = Formador::find_by_user_id(pool, user.id).await?.map(|f| f.id);
    let formando_id = Formando::find_by_user_id(pool, user.id).await?.map(|f| f.id);

    let tokens = create_token_pair(user.id, user.role, formador_id, formando_id, jwt_secret)
        .map_err(|e| DomainError::Authentication(e.to_string()))?;

    info!(user_id = user.id, "User logged in");
    Ok((user, tokens))
}

/// Stores a password-reset token (1 hour validity) on the account.
///
/// Returns `None` when no account matches the email, so callers can answer
/// uniformly without revealing which addresses are registered.
pub async fn request_password_reset(
    pool: &SqlitePool,
    email: &str,
) -> DomainResult<Option<String>> {
    let Some(user) = User::find_by_email(pool, email).await? else {
        return Ok(None);
    };

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();

    User::set_reset_token(pool, user.id, &token, Utc::now() + Duration::hours(1)).await?;

    info!(user_id = user.id, "Password reset token issued");
    Ok(Some(token))
}

/// Consumes a reset token and replaces the account password.
///
/// # Errors
///
/// `Authentication` on an unknown or expired token, `Validation` on a too
/// short password.
pub async fn reset_password(
    pool: &SqlitePool,
    token: &str,
    new_password: &str,
) -> DomainResult<()> {
    if new_password.len() < 8 {
        return Err(DomainError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let user = User::find_by_reset_token(pool, token)
        .await?
        .ok_or_else(|| DomainError::Authentication("invalid or expired reset token".into()))?;

    match user.reset_token_expira {
        Some(expira) if expira > Utc::now() => {}
        _ => {
            return Err(DomainError::Authentication(
                "invalid or expired reset token".into(),
            ))
        }
    }

    let password_hash =
        hash_password(new_password).map_err(|e| DomainError::Validation(e.to_string()))?;
    User::set_password_hash(pool, user.id, &password_hash).await?;

    info!(user_id = user.id, "Password reset completed");
    Ok(())
}
