/// Subject area model. Owns many courses.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Area {
    pub id: i64,
    pub nome: String,
}

impl Area {
    pub async fn create(pool: &SqlitePool, nome: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Area>("INSERT INTO areas (nome) VALUES (?) RETURNING id, nome")
            .bind(nome)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Area>("SELECT id, nome FROM areas WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Area>("SELECT id, nome FROM areas ORDER BY nome ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM areas WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM areas")
            .fetch_one(pool)
            .await
    }
}
