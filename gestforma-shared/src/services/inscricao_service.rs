/// Enrollment service
///
/// Enrollments link trainees to turmas. One enrollment per (turma, formando)
/// pair; withdrawing is a state transition to `Desistiu` so history is
/// retained, with a separate guarded hard delete for administrative cleanup.
use crate::{
    db::integrity::ensure_deletable,
    error::{DomainError, DomainResult},
    models::{
        formando::Formando,
        inscricao::{Inscricao, InscricaoEstado},
        turma::Turma,
    },
};
use sqlx::SqlitePool;
use tracing::info;

/// Enrolls a trainee in a turma, in state `Ativo`.
///
/// `curso_id` is denormalized onto the enrollment and must match the turma's
/// course.
///
/// # Errors
///
/// - `NotFound` when turma or formando do not exist
/// - `Validation` when `curso_id` does not match the turma's course
/// - `Conflict` when the trainee is already enrolled in that turma
pub async fn enroll(
    pool: &SqlitePool,
    turma_id: i64,
    formando_id: i64,
    curso_id: i64,
) -> DomainResult<Inscricao> {
    let turma = Turma::find_by_id(pool, turma_id)
        .await?
        .ok_or_else(|| DomainError::not_found("turma", turma_id))?;

    if Formando::find_by_id(pool, formando_id).await?.is_none() {
        return Err(DomainError::not_found("formando", formando_id));
    }
    if turma.curso_id != curso_id {
        return Err(DomainError::Validation(format!(
            "curso {} does not match turma {}'s curso {}",
            curso_id, turma_id, turma.curso_id
        )));
    }
    if Inscricao::exists_pair(pool, turma_id, formando_id).await? {
        return Err(DomainError::Conflict(format!(
            "formando {} is already enrolled in turma {}",
            formando_id, turma_id
        )));
    }

    let inscricao = Inscricao::create(pool, turma_id, formando_id, curso_id)
        .await
        .map_err(|e| DomainError::from_sqlx(e, "formando is already enrolled in this turma"))?;

    info!(
        inscricao_id = inscricao.id,
        turma_id, formando_id, "Formando enrolled"
    );
    Ok(inscricao)
}

/// Withdraws an enrollment: transitions `Ativo` to `Desistiu`.
///
/// # Errors
///
/// - `NotFound` when the enrollment does not exist
/// - `Conflict` when it is not in state `Ativo`
pub async fn unenroll(pool: &SqlitePool, inscricao_id: i64) -> DomainResult<bool> {
    let inscricao = Inscricao::find_by_id(pool, inscricao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("inscricao", inscricao_id))?;

    if inscricao.estado != InscricaoEstado::Ativo {
        return Err(DomainError::Conflict(format!(
            "inscricao {} is not active (estado: {})",
            inscricao_id,
            inscricao.estado.as_str()
        )));
    }

    let updated = Inscricao::set_estado(pool, inscricao_id, InscricaoEstado::Desistiu).await?;
    info!(inscricao_id, "Formando withdrew from turma");
    Ok(updated)
}

/// Marks an enrollment as completed.
pub async fn conclude(pool: &SqlitePool, inscricao_id: i64) -> DomainResult<bool> {
    let inscricao = Inscricao::find_by_id(pool, inscricao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("inscricao", inscricao_id))?;

    if inscricao.estado != InscricaoEstado::Ativo {
        return Err(DomainError::Conflict(format!(
            "inscricao {} is not active (estado: {})",
            inscricao_id,
            inscricao.estado.as_str()
        )));
    }

    Ok(Inscricao::set_estado(pool, inscricao_id, InscricaoEstado::Concluido).await?)
}

/// Hard-deletes an enrollment record. Administrative cleanup only; blocked
/// while evaluations reference it.
pub async fn delete_inscricao(pool: &SqlitePool, inscricao_id: i64) -> DomainResult<bool> {
    if Inscricao::find_by_id(pool, inscricao_id).await?.is_none() {
        return Err(DomainError::not_found("inscricao", inscricao_id));
    }

    ensure_deletable(pool, "inscricoes", inscricao_id).await?;
    Ok(Inscricao::delete(pool, inscricao_id).await?)
}

pub async fn get_inscricao(pool: &SqlitePool, inscricao_id: i64) -> DomainResult<Inscricao> {
    Inscricao::find_by_id(pool, inscricao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("inscricao", inscricao_id))
}

/// Roster of a turma.
pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> DomainResult<Vec<Inscricao>> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }
    Ok(Inscricao::list_by_turma(pool, turma_id).await?)
}

/// Enrollment history of a trainee.
pub async fn list_by_formando(pool: &SqlitePool, formando_id: i64) -> DomainResult<Vec<Inscricao>> {
    if Formando::find_by_id(pool, formando_id).await?.is_none() {
        return Err(DomainError::not_found("formando", formando_id));
    }
    Ok(Inscricao::list_by_formando(pool, formando_id).await?)
}
