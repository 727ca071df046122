/// User file (ficheiro) model
///
/// Binary blobs owned by a user — CV, photo, documents — stored inline in the
/// relational store. Size limits are a deployment concern, not enforced here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserFicheiro {
    pub id: i64,
    pub user_id: i64,
    pub nome_ficheiro: String,
    pub content_type: String,

    /// File bytes. Skipped in JSON — content is served raw via its own route.
    #[serde(skip_serializing)]
    pub conteudo: Vec<u8>,

    pub created_at: DateTime<Utc>,
}

/// Listing row without the blob, for file indexes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserFicheiroMeta {
    pub id: i64,
    pub user_id: i64,
    pub nome_ficheiro: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl UserFicheiro {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        nome_ficheiro: &str,
        content_type: &str,
        conteudo: Vec<u8>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserFicheiro>(
            "INSERT INTO user_ficheiros (user_id, nome_ficheiro, content_type, conteudo, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, nome_ficheiro, content_type, conteudo, created_at",
        )
        .bind(user_id)
        .bind(nome_ficheiro)
        .bind(content_type)
        .bind(conteudo)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Fetches a file including its content.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserFicheiro>(
            "SELECT id, user_id, nome_ficheiro, content_type, conteudo, created_at \
             FROM user_ficheiros WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's files without their content.
    pub async fn list_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<UserFicheiroMeta>, sqlx::Error> {
        sqlx::query_as::<_, UserFicheiroMeta>(
            "SELECT id, user_id, nome_ficheiro, content_type, created_at \
             FROM user_ficheiros WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_ficheiros WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
