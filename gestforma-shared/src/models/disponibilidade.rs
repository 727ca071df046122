/// Availability (disponibilidade) model
///
/// A time window marking a trainer or a room as available or unavailable.
/// The subject is a tagged variant — one column pair, never a generic
/// (entity-type, entity-id) reference. Windows are independent rows: no
/// overlap merging or deduplication happens on write.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Who or what the window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id", rename_all = "snake_case")]
pub enum DisponibilidadeAlvo {
    Formador(i64),
    Sala(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Disponibilidade {
    pub id: i64,
    pub formador_id: Option<i64>,
    pub sala_id: Option<i64>,

    /// Half-open window `[inicio, fim)`
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,

    /// true = available, false = blocked
    pub disponivel: bool,
}

impl Disponibilidade {
    /// The tagged subject. Exactly one column is set (schema CHECK).
    pub fn alvo(&self) -> DisponibilidadeAlvo {
        match (self.formador_id, self.sala_id) {
            (Some(id), None) => DisponibilidadeAlvo::Formador(id),
            (None, Some(id)) => DisponibilidadeAlvo::Sala(id),
            _ => unreachable!(
                "disponibilidades CHECK constraint violated for window {}",
                self.id
            ),
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        alvo: DisponibilidadeAlvo,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
        disponivel: bool,
    ) -> Result<Self, sqlx::Error> {
        let (formador_id, sala_id) = match alvo {
            DisponibilidadeAlvo::Formador(id) => (Some(id), None),
            DisponibilidadeAlvo::Sala(id) => (None, Some(id)),
        };

        sqlx::query_as::<_, Disponibilidade>(
            "INSERT INTO disponibilidades (formador_id, sala_id, inicio, fim, disponivel) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, formador_id, sala_id, inicio, fim, disponivel",
        )
        .bind(formador_id)
        .bind(sala_id)
        .bind(inicio)
        .bind(fim)
        .bind(disponivel)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Disponibilidade>(
            "SELECT id, formador_id, sala_id, inicio, fim, disponivel \
             FROM disponibilidades WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Windows of one trainer intersecting `[desde, ate)`.
    pub async fn list_by_formador_range(
        pool: &SqlitePool,
        formador_id: i64,
        desde: DateTime<Utc>,
        ate: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Disponibilidade>(
            "SELECT id, formador_id, sala_id, inicio, fim, disponivel \
             FROM disponibilidades \
             WHERE formador_id = ? AND inicio < ? AND fim > ? \
             ORDER BY inicio ASC",
        )
        .bind(formador_id)
        .bind(ate)
        .bind(desde)
        .fetch_all(pool)
        .await
    }

    /// Windows of one room intersecting `[desde, ate)`.
    pub async fn list_by_sala_range(
        pool: &SqlitePool,
        sala_id: i64,
        desde: DateTime<Utc>,
        ate: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Disponibilidade>(
            "SELECT id, formador_id, sala_id, inicio, fim, disponivel \
             FROM disponibilidades \
             WHERE sala_id = ? AND inicio < ? AND fim > ? \
             ORDER BY inicio ASC",
        )
        .bind(sala_id)
        .bind(ate)
        .bind(desde)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM disponibilidades WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
