/// Enrollment (inscricao) model
///
/// Links a trainee to a turma, with the course id denormalized for direct
/// history queries. One enrollment per (turma, formando) pair. Withdrawal is
/// a state transition, not a delete — history is retained.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Enrollment state. Persisted as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum InscricaoEstado {
    /// Enrolled and attending
    Ativo,

    /// Withdrew before completion
    Desistiu,

    /// Completed the turma
    Concluido,

    /// Waiting-list reservation
    Reserva,
}

impl InscricaoEstado {
    pub fn as_str(&self) -> &'static str {
        match self {
            InscricaoEstado::Ativo => "Ativo",
            InscricaoEstado::Desistiu => "Desistiu",
            InscricaoEstado::Concluido => "Concluido",
            InscricaoEstado::Reserva => "Reserva",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inscricao {
    pub id: i64,
    pub turma_id: i64,
    pub formando_id: i64,
    pub curso_id: i64,
    pub data_inscricao: DateTime<Utc>,
    pub estado: InscricaoEstado,
}

const INSCRICAO_COLUMNS: &str = "id, turma_id, formando_id, curso_id, data_inscricao, estado";

impl Inscricao {
    pub async fn create(
        pool: &SqlitePool,
        turma_id: i64,
        formando_id: i64,
        curso_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Inscricao>(&format!(
            "INSERT INTO inscricoes (turma_id, formando_id, curso_id, data_inscricao, estado) \
             VALUES (?, ?, ?, ?, 'Ativo') \
             RETURNING {INSCRICAO_COLUMNS}"
        ))
        .bind(turma_id)
        .bind(formando_id)
        .bind(curso_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Inscricao>(&format!(
            "SELECT {INSCRICAO_COLUMNS} FROM inscricoes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Roster of a turma.
    pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Inscricao>(&format!(
            "SELECT {INSCRICAO_COLUMNS} FROM inscricoes WHERE turma_id = ? ORDER BY data_inscricao ASC"
        ))
        .bind(turma_id)
        .fetch_all(pool)
        .await
    }

    /// Enrollment history of a trainee.
    pub async fn list_by_formando(
        pool: &SqlitePool,
        formando_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Inscricao>(&format!(
            "SELECT {INSCRICAO_COLUMNS} FROM inscricoes WHERE formando_id = ? ORDER BY data_inscricao DESC"
        ))
        .bind(formando_id)
        .fetch_all(pool)
        .await
    }

    pub async fn exists_pair(
        pool: &SqlitePool,
        turma_id: i64,
        formando_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inscricoes WHERE turma_id = ? AND formando_id = ?",
        )
        .bind(turma_id)
        .bind(formando_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn set_estado(
        pool: &SqlitePool,
        id: i64,
        estado: InscricaoEstado,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE inscricoes SET estado = ? WHERE id = ?")
            .bind(estado)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inscricoes WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_ativas(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM inscricoes WHERE estado = 'Ativo'")
            .fetch_one(pool)
            .await
    }
}
