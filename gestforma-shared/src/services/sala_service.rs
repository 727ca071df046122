/// Room service
use crate::{
    db::integrity::ensure_deletable,
    error::{DomainError, DomainResult},
    models::sala::{CreateSala, Sala},
};
use sqlx::SqlitePool;
use tracing::info;

pub async fn create_sala(pool: &SqlitePool, data: CreateSala) -> DomainResult<Sala> {
    if data.nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }
    if data.capacidade <= 0 {
        return Err(DomainError::Validation(
            "capacidade must be positive".into(),
        ));
    }

    let sala = Sala::create(pool, data).await?;
    info!(sala_id = sala.id, "Sala created");
    Ok(sala)
}

pub async fn get_sala(pool: &SqlitePool, sala_id: i64) -> DomainResult<Sala> {
    Sala::find_by_id(pool, sala_id)
        .await?
        .ok_or_else(|| DomainError::not_found("sala", sala_id))
}

pub async fn list_salas(pool: &SqlitePool) -> DomainResult<Vec<Sala>> {
    Ok(Sala::list(pool).await?)
}

/// Blocked while sessions, availabilities, or catalog associations reference
/// the room.
pub async fn delete_sala(pool: &SqlitePool, sala_id: i64) -> DomainResult<bool> {
    if Sala::find_by_id(pool, sala_id).await?.is_none() {
        return Err(DomainError::not_found("sala", sala_id));
    }

    ensure_deletable(pool, "salas", sala_id).await?;
    Ok(Sala::delete(pool, sala_id).await?)
}
