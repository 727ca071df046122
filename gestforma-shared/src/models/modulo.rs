/// Teachable module model. Reusable across courses through the
/// `curso_modulos` association.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Modulo {
    pub id: i64,
    pub nome: String,

    /// Total workload in hours
    pub carga_horaria: i64,
}

impl Modulo {
    pub async fn create(
        pool: &SqlitePool,
        nome: &str,
        carga_horaria: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Modulo>(
            "INSERT INTO modulos (nome, carga_horaria) VALUES (?, ?) \
             RETURNING id, nome, carga_horaria",
        )
        .bind(nome)
        .bind(carga_horaria)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Modulo>("SELECT id, nome, carga_horaria FROM modulos WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Modulo>(
            "SELECT id, nome, carga_horaria FROM modulos ORDER BY nome ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modulos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM modulos")
            .fetch_one(pool)
            .await
    }
}
