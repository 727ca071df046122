/// Turma (class group) model
///
/// A cohort following one course over a date range. Owns enrollments and
/// module distributions; neither may exist when the turma is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE turmas (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     curso_id INTEGER NOT NULL REFERENCES cursos(id),
///     nome TEXT NOT NULL,
///     data_inicio TEXT NOT NULL,
///     data_fim TEXT NOT NULL,
///     local TEXT NOT NULL,
///     estado TEXT NOT NULL DEFAULT 'Planeada'
/// );
/// ```
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Turma lifecycle state. Persisted as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum TurmaEstado {
    /// Planned, not yet started
    Planeada,

    /// Currently running
    Decorrer,

    /// Finished
    Terminada,

    /// Cancelled
    Cancelada,
}

impl TurmaEstado {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurmaEstado::Planeada => "Planeada",
            TurmaEstado::Decorrer => "Decorrer",
            TurmaEstado::Terminada => "Terminada",
            TurmaEstado::Cancelada => "Cancelada",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Turma {
    pub id: i64,
    pub curso_id: i64,
    pub nome: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub local: String,
    pub estado: TurmaEstado,
}

/// Input for creating a turma. Date ordering is validated by the service,
/// not the store.
#[derive(Debug, Clone)]
pub struct CreateTurma {
    pub curso_id: i64,
    pub nome: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub local: String,
}

const TURMA_COLUMNS: &str = "id, curso_id, nome, data_inicio, data_fim, local, estado";

impl Turma {
    pub async fn create(pool: &SqlitePool, data: CreateTurma) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Turma>(&format!(
            "INSERT INTO turmas (curso_id, nome, data_inicio, data_fim, local, estado) \
             VALUES (?, ?, ?, ?, ?, 'Planeada') \
             RETURNING {TURMA_COLUMNS}"
        ))
        .bind(data.curso_id)
        .bind(data.nome)
        .bind(data.data_inicio)
        .bind(data.data_fim)
        .bind(data.local)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Turma>(&format!("SELECT {TURMA_COLUMNS} FROM turmas WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Turma>(&format!(
            "SELECT {TURMA_COLUMNS} FROM turmas ORDER BY data_inicio DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_curso(pool: &SqlitePool, curso_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Turma>(&format!(
            "SELECT {TURMA_COLUMNS} FROM turmas WHERE curso_id = ? ORDER BY data_inicio DESC"
        ))
        .bind(curso_id)
        .fetch_all(pool)
        .await
    }

    pub async fn set_estado(
        pool: &SqlitePool,
        id: i64,
        estado: TurmaEstado,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE turmas SET estado = ? WHERE id = ?")
            .bind(estado)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM turmas WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM turmas")
            .fetch_one(pool)
            .await
    }
}
