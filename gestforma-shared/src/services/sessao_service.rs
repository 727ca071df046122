/// Session scheduling service
///
/// Sessions book a room for a module delivery over a half-open interval.
/// Room double-booking is rejected: a new session conflicting with any
/// existing session in the same room fails with `Conflict`. Trainer overlap
/// is not checked — room contention is the domain's scheduling-conflict risk.
use crate::{
    error::{DomainError, DomainResult},
    models::{
        curso_modulo::CursoModulo,
        formador::Formador,
        sala::Sala,
        sessao::{intervalos_sobrepostos, Sessao, SessaoAlvo},
        turma::Turma,
        turma_modulo::TurmaModulo,
    },
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

/// Schedules a session.
///
/// # Errors
///
/// - `Validation` when `inicio >= fim`
/// - `NotFound` when the target distribution/association or the room is missing
/// - `Conflict` when the room already has a session overlapping the window
pub async fn create_sessao(
    pool: &SqlitePool,
    alvo: SessaoAlvo,
    sala_id: i64,
    inicio: DateTime<Utc>,
    fim: DateTime<Utc>,
) -> DomainResult<Sessao> {
    if inicio >= fim {
        return Err(DomainError::Validation(
            "inicio must be before fim".into(),
        ));
    }

    match alvo {
        SessaoAlvo::TurmaModulo(id) => {
            if TurmaModulo::find_by_id(pool, id).await?.is_none() {
                return Err(DomainError::not_found("turma_modulo", id));
            }
        }
        SessaoAlvo::CursoModulo(id) => {
            if CursoModulo::find_by_id(pool, id).await?.is_none() {
                return Err(DomainError::not_found("curso_modulo", id));
            }
        }
    }

    if Sala::find_by_id(pool, sala_id).await?.is_none() {
        return Err(DomainError::not_found("sala", sala_id));
    }

    // Double-booking check against every session already in the room.
    for existente in Sessao::list_by_sala(pool, sala_id).await? {
        if intervalos_sobrepostos(inicio, fim, existente.inicio, existente.fim) {
            return Err(DomainError::Conflict(format!(
                "sala {} is already booked from {} to {} (sessao {})",
                sala_id, existente.inicio, existente.fim, existente.id
            )));
        }
    }

    let sessao = Sessao::create(pool, alvo, sala_id, inicio, fim).await?;
    info!(sessao_id = sessao.id, sala_id, "Sessao scheduled");
    Ok(sessao)
}

pub async fn delete_sessao(pool: &SqlitePool, sessao_id: i64) -> DomainResult<bool> {
    if Sessao::find_by_id(pool, sessao_id).await?.is_none() {
        return Err(DomainError::not_found("sessao", sessao_id));
    }
    Ok(Sessao::delete(pool, sessao_id).await?)
}

/// Sessions of one turma, across all of its module distributions.
pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> DomainResult<Vec<Sessao>> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }
    Ok(Sessao::list_by_turma(pool, turma_id).await?)
}

/// Sessions taught by a trainer within `[desde, ate)`.
pub async fn list_by_formador(
    pool: &SqlitePool,
    formador_id: i64,
    desde: DateTime<Utc>,
    ate: DateTime<Utc>,
) -> DomainResult<Vec<Sessao>> {
    if desde >= ate {
        return Err(DomainError::Validation(
            "desde must be before ate".into(),
        ));
    }
    if Formador::find_by_id(pool, formador_id).await?.is_none() {
        return Err(DomainError::not_found("formador", formador_id));
    }
    Ok(Sessao::list_by_formador_range(pool, formador_id, desde, ate).await?)
}
