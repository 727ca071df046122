/// Profile & file service
///
/// Trainer/trainee profile upserts keyed by user id, and the inline file
/// store (CV, photos, documents) owned by users.
use crate::{
    db::integrity::ensure_deletable,
    error::{DomainError, DomainResult},
    models::{
        formador::{CreateFormador, Formador},
        formando::{CreateFormando, Formando},
        user::User,
        user_ficheiro::{UserFicheiro, UserFicheiroMeta},
    },
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

/// Idempotent upsert: returns the existing trainer profile or creates one.
pub async fn get_or_create_formador(
    pool: &SqlitePool,
    user_id: i64,
    area_especializacao: &str,
) -> DomainResult<Formador> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(DomainError::not_found("user", user_id));
    }

    if let Some(existing) = Formador::find_by_user_id(pool, user_id).await? {
        return Ok(existing);
    }

    let formador = Formador::create(
        pool,
        CreateFormador {
            user_id,
            area_especializacao: area_especializacao.to_string(),
            cor_calendario: None,
        },
    )
    .await
    .map_err(|e| DomainError::from_sqlx(e, "user already has a trainer profile"))?;

    info!(formador_id = formador.id, user_id, "Formador profile created");
    Ok(formador)
}

/// Strict create: fails with `Conflict` when the user already has a trainer
/// profile.
pub async fn create_formador(pool: &SqlitePool, data: CreateFormador) -> DomainResult<Formador> {
    if User::find_by_id(pool, data.user_id).await?.is_none() {
        return Err(DomainError::not_found("user", data.user_id));
    }
    if Formador::find_by_user_id(pool, data.user_id).await?.is_some() {
        return Err(DomainError::Conflict(format!(
            "user {} already has a trainer profile",
            data.user_id
        )));
    }

    Formador::create(pool, data)
        .await
        .map_err(|e| DomainError::from_sqlx(e, "user already has a trainer profile"))
}

/// Idempotent upsert: returns the existing trainee profile or creates one.
pub async fn get_or_create_formando(
    pool: &SqlitePool,
    user_id: i64,
    numero_aluno: &str,
    data_nascimento: Option<NaiveDate>,
) -> DomainResult<Formando> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(DomainError::not_found("user", user_id));
    }

    if let Some(existing) = Formando::find_by_user_id(pool, user_id).await? {
        return Ok(existing);
    }

    let formando = Formando::create(
        pool,
        CreateFormando {
            user_id,
            numero_aluno: numero_aluno.to_string(),
            data_nascimento,
        },
    )
    .await
    .map_err(|e| DomainError::from_sqlx(e, "student number is already taken"))?;

    info!(formando_id = formando.id, user_id, "Formando profile created");
    Ok(formando)
}

/// Strict create: fails with `Conflict` when the user already has a trainee
/// profile or the student number is taken.
pub async fn create_formando(pool: &SqlitePool, data: CreateFormando) -> DomainResult<Formando> {
    if User::find_by_id(pool, data.user_id).await?.is_none() {
        return Err(DomainError::not_found("user", data.user_id));
    }
    if Formando::find_by_user_id(pool, data.user_id).await?.is_some() {
        return Err(DomainError::Conflict(format!(
            "user {} already has a trainee profile",
            data.user_id
        )));
    }

    Formando::create(pool, data)
        .await
        .map_err(|e| DomainError::from_sqlx(e, "student number is already taken"))
}

pub async fn list_utilizadores(pool: &SqlitePool) -> DomainResult<Vec<User>> {
    Ok(User::list(pool).await?)
}

/// Activates or deactivates an account. Inactive accounts cannot log in.
pub async fn set_utilizador_ativo(
    pool: &SqlitePool,
    user_id: i64,
    ativo: bool,
) -> DomainResult<User> {
    if !User::set_ativo(pool, user_id, ativo).await? {
        return Err(DomainError::not_found("user", user_id));
    }
    info!(user_id, ativo, "Account status changed");
    User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", user_id))
}

/// Deletes an account. Blocked while a profile or files still reference it.
pub async fn delete_utilizador(pool: &SqlitePool, user_id: i64) -> DomainResult<bool> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(DomainError::not_found("user", user_id));
    }
    ensure_deletable(pool, "users", user_id).await?;
    Ok(User::delete(pool, user_id).await?)
}

pub async fn list_formadores(pool: &SqlitePool) -> DomainResult<Vec<Formador>> {
    Ok(Formador::list(pool).await?)
}

/// Deletes a trainer profile. Blocked while assignments, sessions or
/// availability windows still reference it.
pub async fn delete_formador(pool: &SqlitePool, formador_id: i64) -> DomainResult<bool> {
    if Formador::find_by_id(pool, formador_id).await?.is_none() {
        return Err(DomainError::not_found("formador", formador_id));
    }
    ensure_deletable(pool, "formadores", formador_id).await?;
    Ok(Formador::delete(pool, formador_id).await?)
}

pub async fn list_formandos(pool: &SqlitePool) -> DomainResult<Vec<Formando>> {
    Ok(Formando::list(pool).await?)
}

/// Deletes a trainee profile. Blocked while enrollments still reference it.
pub async fn delete_formando(pool: &SqlitePool, formando_id: i64) -> DomainResult<bool> {
    if Formando::find_by_id(pool, formando_id).await?.is_none() {
        return Err(DomainError::not_found("formando", formando_id));
    }
    ensure_deletable(pool, "formandos", formando_id).await?;
    Ok(Formando::delete(pool, formando_id).await?)
}

/// Stores a file inline for a user.
///
/// # Errors
///
/// - `NotFound` when the user does not exist
/// - `Validation` on an empty filename or empty content
pub async fn upload_ficheiro(
    pool: &SqlitePool,
    user_id: i64,
    nome_ficheiro: &str,
    content_type: &str,
    conteudo: Vec<u8>,
) -> DomainResult<UserFicheiro> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(DomainError::not_found("user", user_id));
    }
    if nome_ficheiro.trim().is_empty() {
        return Err(DomainError::Validation("nome_ficheiro is required".into()));
    }
    if conteudo.is_empty() {
        return Err(DomainError::Validation("file content is empty".into()));
    }

    let ficheiro =
        UserFicheiro::create(pool, user_id, nome_ficheiro, content_type, conteudo).await?;
    info!(
        ficheiro_id = ficheiro.id,
        user_id,
        size = ficheiro.conteudo.len(),
        "File stored"
    );
    Ok(ficheiro)
}

/// Fetches a file with its content.
pub async fn get_ficheiro(pool: &SqlitePool, ficheiro_id: i64) -> DomainResult<UserFicheiro> {
    UserFicheiro::find_by_id(pool, ficheiro_id)
        .await?
        .ok_or_else(|| DomainError::not_found("ficheiro", ficheiro_id))
}

pub async fn list_ficheiros_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> DomainResult<Vec<UserFicheiroMeta>> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(DomainError::not_found("user", user_id));
    }
    Ok(UserFicheiro::list_by_user(pool, user_id).await?)
}

pub async fn delete_ficheiro(pool: &SqlitePool, ficheiro_id: i64) -> DomainResult<bool> {
    if UserFicheiro::find_by_id(pool, ficheiro_id).await?.is_none() {
        return Err(DomainError::not_found("ficheiro", ficheiro_id));
    }
    Ok(UserFicheiro::delete(pool, ficheiro_id).await?)
}
