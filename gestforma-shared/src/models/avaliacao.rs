/// Evaluation (avaliacao) model
///
/// A grade for one enrollment on one module distribution. Writes are gated by
/// role and trainer ownership in the evaluation service; the model only
/// persists.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Avaliacao {
    pub id: i64,
    pub turma_id: i64,
    pub inscricao_id: i64,
    pub turma_modulo_id: i64,

    /// Grade on the 0-20 scale
    pub nota: f64,

    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAvaliacao {
    pub turma_id: i64,
    pub inscricao_id: i64,
    pub turma_modulo_id: i64,
    pub nota: f64,
    pub observacoes: Option<String>,
}

const AVALIACAO_COLUMNS: &str =
    "id, turma_id, inscricao_id, turma_modulo_id, nota, observacoes, created_at";

impl Avaliacao {
    pub async fn create(pool: &SqlitePool, data: CreateAvaliacao) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Avaliacao>(&format!(
            "INSERT INTO avaliacoes (turma_id, inscricao_id, turma_modulo_id, nota, observacoes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {AVALIACAO_COLUMNS}"
        ))
        .bind(data.turma_id)
        .bind(data.inscricao_id)
        .bind(data.turma_modulo_id)
        .bind(data.nota)
        .bind(data.observacoes)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Avaliacao>(&format!(
            "SELECT {AVALIACAO_COLUMNS} FROM avaliacoes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Avaliacao>(&format!(
            "SELECT {AVALIACAO_COLUMNS} FROM avaliacoes WHERE turma_id = ? ORDER BY id ASC"
        ))
        .bind(turma_id)
        .fetch_all(pool)
        .await
    }

    /// Grades of one trainee across all enrollments.
    pub async fn list_by_formando(
        pool: &SqlitePool,
        formando_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Avaliacao>(
            "SELECT a.id, a.turma_id, a.inscricao_id, a.turma_modulo_id, a.nota, \
                    a.observacoes, a.created_at \
             FROM avaliacoes a \
             JOIN inscricoes i ON i.id = a.inscricao_id \
             WHERE i.formando_id = ? ORDER BY a.id ASC",
        )
        .bind(formando_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update_nota(
        pool: &SqlitePool,
        id: i64,
        nota: f64,
        observacoes: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Avaliacao>(&format!(
            "UPDATE avaliacoes SET nota = ?, observacoes = ? WHERE id = ? \
             RETURNING {AVALIACAO_COLUMNS}"
        ))
        .bind(nota)
        .bind(observacoes)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM avaliacoes WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
