/// Trainer (formador) profile model
///
/// Linked 1:1 to a user via `user_id UNIQUE`. A profile cannot exist without
/// its owning user; the FK guarantees that, and the unique constraint makes a
/// second profile for the same user a store-level conflict.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Formador {
    pub id: i64,
    pub user_id: i64,

    /// Subject area the trainer specializes in
    pub area_especializacao: String,

    /// Color used for this trainer in calendar views
    pub cor_calendario: String,
}

/// Input for creating a trainer profile.
#[derive(Debug, Clone)]
pub struct CreateFormador {
    pub user_id: i64,
    pub area_especializacao: String,
    pub cor_calendario: Option<String>,
}

impl Formador {
    pub async fn create<'e, E>(db: E, data: CreateFormador) -> Result<Self, sqlx::Error>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Formador>(
            "INSERT INTO formadores (user_id, area_especializacao, cor_calendario) \
             VALUES (?, ?, ?) \
             RETURNING id, user_id, area_especializacao, cor_calendario",
        )
        .bind(data.user_id)
        .bind(data.area_especializacao)
        .bind(data.cor_calendario.unwrap_or_else(|| "#3788d8".to_string()))
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formador>(
            "SELECT id, user_id, area_especializacao, cor_calendario FROM formadores WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formador>(
            "SELECT id, user_id, area_especializacao, cor_calendario \
             FROM formadores WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formador>(
            "SELECT id, user_id, area_especializacao, cor_calendario \
             FROM formadores ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM formadores WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM formadores")
            .fetch_one(pool)
            .await
    }
}
