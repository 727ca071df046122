/// Trainee (formando) profile model
///
/// Linked 1:1 to a user via `user_id UNIQUE`. The student number is unique
/// across the institution.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Formando {
    pub id: i64,
    pub user_id: i64,

    /// Institution-wide student number (unique)
    pub numero_aluno: String,

    pub data_nascimento: Option<NaiveDate>,
}

/// Input for creating a trainee profile.
#[derive(Debug, Clone)]
pub struct CreateFormando {
    pub user_id: i64,
    pub numero_aluno: String,
    pub data_nascimento: Option<NaiveDate>,
}

impl Formando {
    pub async fn create<'e, E>(db: E, data: CreateFormando) -> Result<Self, sqlx::Error>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Formando>(
            "INSERT INTO formandos (user_id, numero_aluno, data_nascimento) \
             VALUES (?, ?, ?) \
             RETURNING id, user_id, numero_aluno, data_nascimento",
        )
        .bind(data.user_id)
        .bind(data.numero_aluno)
        .bind(data.data_nascimento)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formando>(
            "SELECT id, user_id, numero_aluno, data_nascimento FROM formandos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formando>(
            "SELECT id, user_id, numero_aluno, data_nascimento FROM formandos WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Formando>(
            "SELECT id, user_id, numero_aluno, data_nascimento FROM formandos ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM formandos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM formandos")
            .fetch_one(pool)
            .await
    }
}
