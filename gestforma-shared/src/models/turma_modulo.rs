/// Turma-module distribution model
///
/// Assigns a module to a turma with the trainer delivering it and a sequence
/// number ordering module delivery within the turma. Sequence numbers are not
/// required to be unique or contiguous. The (turma, modulo) pair is unique:
/// a turma delivers each module at most once.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TurmaModulo {
    pub id: i64,
    pub turma_id: i64,
    pub modulo_id: i64,
    pub formador_id: i64,
    pub sequencia: i64,
}

#[derive(Debug, Clone)]
pub struct CreateTurmaModulo {
    pub turma_id: i64,
    pub modulo_id: i64,
    pub formador_id: i64,
    pub sequencia: i64,
}

impl TurmaModulo {
    pub async fn create(pool: &SqlitePool, data: CreateTurmaModulo) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TurmaModulo>(
            "INSERT INTO turma_modulos (turma_id, modulo_id, formador_id, sequencia) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, turma_id, modulo_id, formador_id, sequencia",
        )
        .bind(data.turma_id)
        .bind(data.modulo_id)
        .bind(data.formador_id)
        .bind(data.sequencia)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TurmaModulo>(
            "SELECT id, turma_id, modulo_id, formador_id, sequencia \
             FROM turma_modulos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Distributions of one turma, in delivery order.
    pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TurmaModulo>(
            "SELECT id, turma_id, modulo_id, formador_id, sequencia \
             FROM turma_modulos WHERE turma_id = ? ORDER BY sequencia ASC, id ASC",
        )
        .bind(turma_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_formador(
        pool: &SqlitePool,
        formador_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TurmaModulo>(
            "SELECT id, turma_id, modulo_id, formador_id, sequencia \
             FROM turma_modulos WHERE formador_id = ? ORDER BY turma_id ASC, sequencia ASC",
        )
        .bind(formador_id)
        .fetch_all(pool)
        .await
    }

    pub async fn exists_pair(
        pool: &SqlitePool,
        turma_id: i64,
        modulo_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM turma_modulos WHERE turma_id = ? AND modulo_id = ?",
        )
        .bind(turma_id)
        .bind(modulo_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM turma_modulos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM turma_modulos")
            .fetch_one(pool)
            .await
    }
}
