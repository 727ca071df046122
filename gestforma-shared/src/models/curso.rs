/// Course model. Belongs to one area, owns many turmas.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Curso {
    pub id: i64,
    pub area_id: i64,
    pub nome: String,

    /// Qualification level (e.g. "Nivel 4")
    pub nivel: String,
}

#[derive(Debug, Clone)]
pub struct CreateCurso {
    pub area_id: i64,
    pub nome: String,
    pub nivel: String,
}

impl Curso {
    pub async fn create(pool: &SqlitePool, data: CreateCurso) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Curso>(
            "INSERT INTO cursos (area_id, nome, nivel) VALUES (?, ?, ?) \
             RETURNING id, area_id, nome, nivel",
        )
        .bind(data.area_id)
        .bind(data.nome)
        .bind(data.nivel)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Curso>("SELECT id, area_id, nome, nivel FROM cursos WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Curso>("SELECT id, area_id, nome, nivel FROM cursos ORDER BY nome ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_area(pool: &SqlitePool, area_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Curso>(
            "SELECT id, area_id, nome, nivel FROM cursos WHERE area_id = ? ORDER BY nome ASC",
        )
        .bind(area_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cursos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cursos")
            .fetch_one(pool)
            .await
    }
}
