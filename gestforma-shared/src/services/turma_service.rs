/// Turma & distribution service
///
/// Class-group lifecycle and the assignment of modules to turmas. All
/// referential rules live here: the store only backs them up with its unique
/// and foreign-key constraints.
use crate::{
    db::integrity::ensure_deletable,
    error::{DomainError, DomainResult},
    models::{
        curso::Curso,
        formador::Formador,
        modulo::Modulo,
        turma::{CreateTurma, Turma},
        turma_modulo::{CreateTurmaModulo, TurmaModulo},
    },
};
use sqlx::SqlitePool;
use tracing::info;

/// Creates a turma for an existing course.
///
/// # Errors
///
/// - `NotFound` when the course does not exist
/// - `Validation` when `data_inicio > data_fim` (the store does not order dates)
pub async fn create_turma(pool: &SqlitePool, data: CreateTurma) -> DomainResult<Turma> {
    if Curso::find_by_id(pool, data.curso_id).await?.is_none() {
        return Err(DomainError::not_found("curso", data.curso_id));
    }
    if data.data_inicio > data.data_fim {
        return Err(DomainError::Validation(
            "data_inicio must not be after data_fim".into(),
        ));
    }
    if data.nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }

    let turma = Turma::create(pool, data).await?;
    info!(turma_id = turma.id, curso_id = turma.curso_id, "Turma created");
    Ok(turma)
}

/// Assigns a module to a turma with its trainer and sequence number.
///
/// # Errors
///
/// - `NotFound` when turma, modulo, or formador do not exist
/// - `Conflict` when the turma already delivers that module
pub async fn add_modulo(
    pool: &SqlitePool,
    turma_id: i64,
    modulo_id: i64,
    formador_id: i64,
    sequencia: i64,
) -> DomainResult<TurmaModulo> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }
    if Modulo::find_by_id(pool, modulo_id).await?.is_none() {
        return Err(DomainError::not_found("modulo", modulo_id));
    }
    if Formador::find_by_id(pool, formador_id).await?.is_none() {
        return Err(DomainError::not_found("formador", formador_id));
    }
    if TurmaModulo::exists_pair(pool, turma_id, modulo_id).await? {
        return Err(DomainError::Conflict(format!(
            "turma {} already delivers modulo {}",
            turma_id, modulo_id
        )));
    }

    let tm = TurmaModulo::create(
        pool,
        CreateTurmaModulo {
            turma_id,
            modulo_id,
            formador_id,
            sequencia,
        },
    )
    .await
    .map_err(|e| DomainError::from_sqlx(e, "turma already delivers this modulo"))?;

    info!(
        turma_modulo_id = tm.id,
        turma_id, modulo_id, formador_id, "Modulo assigned to turma"
    );
    Ok(tm)
}

/// Removes a module distribution. Blocked while sessions or evaluations
/// reference it.
pub async fn remove_modulo(pool: &SqlitePool, turma_modulo_id: i64) -> DomainResult<bool> {
    if TurmaModulo::find_by_id(pool, turma_modulo_id).await?.is_none() {
        return Err(DomainError::not_found("turma_modulo", turma_modulo_id));
    }

    ensure_deletable(pool, "turma_modulos", turma_modulo_id).await?;
    Ok(TurmaModulo::delete(pool, turma_modulo_id).await?)
}

/// Deletes a turma. Fails with `Conflict` — never silently — while it has
/// enrollments or module distributions.
pub async fn delete_turma(pool: &SqlitePool, turma_id: i64) -> DomainResult<bool> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }

    ensure_deletable(pool, "turmas", turma_id).await?;

    let deleted = Turma::delete(pool, turma_id).await?;
    info!(turma_id, "Turma deleted");
    Ok(deleted)
}

pub async fn get_turma(pool: &SqlitePool, turma_id: i64) -> DomainResult<Turma> {
    Turma::find_by_id(pool, turma_id)
        .await?
        .ok_or_else(|| DomainError::not_found("turma", turma_id))
}

pub async fn list_turmas(pool: &SqlitePool) -> DomainResult<Vec<Turma>> {
    Ok(Turma::list(pool).await?)
}

pub async fn list_turmas_do_curso(pool: &SqlitePool, curso_id: i64) -> DomainResult<Vec<Turma>> {
    if Curso::find_by_id(pool, curso_id).await?.is_none() {
        return Err(DomainError::not_found("curso", curso_id));
    }
    Ok(Turma::list_by_curso(pool, curso_id).await?)
}

/// Module distributions assigned to one trainer, across all turmas.
pub async fn list_modulos_do_formador(
    pool: &SqlitePool,
    formador_id: i64,
) -> DomainResult<Vec<TurmaModulo>> {
    if Formador::find_by_id(pool, formador_id).await?.is_none() {
        return Err(DomainError::not_found("formador", formador_id));
    }
    Ok(TurmaModulo::list_by_formador(pool, formador_id).await?)
}

/// Module distributions of one turma, in delivery order.
pub async fn list_modulos_da_turma(
    pool: &SqlitePool,
    turma_id: i64,
) -> DomainResult<Vec<TurmaModulo>> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }
    Ok(TurmaModulo::list_by_turma(pool, turma_id).await?)
}
