/// Availability service
///
/// Windows marking a trainer or room (un)available. Windows are stored as
/// given: no overlap merging, no conflict detection, no deduplication —
/// callers see exactly the rows they created.
use crate::{
    error::{DomainError, DomainResult},
    models::{
        disponibilidade::{Disponibilidade, DisponibilidadeAlvo},
        formador::Formador,
        sala::Sala,
    },
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

/// Creates an availability window for a trainer or room.
///
/// # Errors
///
/// - `Validation` when `inicio >= fim`
/// - `NotFound` when the subject does not exist
pub async fn create_disponibilidade(
    pool: &SqlitePool,
    alvo: DisponibilidadeAlvo,
    inicio: DateTime<Utc>,
    fim: DateTime<Utc>,
    disponivel: bool,
) -> DomainResult<Disponibilidade> {
    if inicio >= fim {
        return Err(DomainError::Validation(
            "inicio must be before fim".into(),
        ));
    }

    match alvo {
        DisponibilidadeAlvo::Formador(id) => {
            if Formador::find_by_id(pool, id).await?.is_none() {
                return Err(DomainError::not_found("formador", id));
            }
        }
        DisponibilidadeAlvo::Sala(id) => {
            if Sala::find_by_id(pool, id).await?.is_none() {
                return Err(DomainError::not_found("sala", id));
            }
        }
    }

    let window = Disponibilidade::create(pool, alvo, inicio, fim, disponivel).await?;
    info!(disponibilidade_id = window.id, "Availability window created");
    Ok(window)
}

pub async fn get_disponibilidade(pool: &SqlitePool, id: i64) -> DomainResult<Disponibilidade> {
    Disponibilidade::find_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found("disponibilidade", id))
}

pub async fn delete_disponibilidade(pool: &SqlitePool, id: i64) -> DomainResult<bool> {
    if Disponibilidade::find_by_id(pool, id).await?.is_none() {
        return Err(DomainError::not_found("disponibilidade", id));
    }
    Ok(Disponibilidade::delete(pool, id).await?)
}

/// Windows of one trainer intersecting `[desde, ate)`.
pub async fn list_by_formador(
    pool: &SqlitePool,
    formador_id: i64,
    desde: DateTime<Utc>,
    ate: DateTime<Utc>,
) -> DomainResult<Vec<Disponibilidade>> {
    if Formador::find_by_id(pool, formador_id).await?.is_none() {
        return Err(DomainError::not_found("formador", formador_id));
    }
    Ok(Disponibilidade::list_by_formador_range(pool, formador_id, desde, ate).await?)
}

/// Windows of one room intersecting `[desde, ate)`.
pub async fn list_by_sala(
    pool: &SqlitePool,
    sala_id: i64,
    desde: DateTime<Utc>,
    ate: DateTime<Utc>,
) -> DomainResult<Vec<Disponibilidade>> {
    if Sala::find_by_id(pool, sala_id).await?.is_none() {
        return Err(DomainError::not_found("sala", sala_id));
    }
    Ok(Disponibilidade::list_by_sala_range(pool, sala_id, desde, ate).await?)
}
