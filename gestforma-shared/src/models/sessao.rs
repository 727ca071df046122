/// Session (sessao) model
///
/// A scheduled meeting in a room over a half-open time interval
/// `[inicio, fim)`. A session targets exactly one of:
///
/// - a turma-module distribution (the normal case: a turma's lesson), or
/// - a course-module association (catalog-level scheduling).
///
/// The two legacy meeting concepts collapse into this single entity; the
/// target is a tagged variant rather than two parallel tables.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// What a session is scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id", rename_all = "snake_case")]
pub enum SessaoAlvo {
    /// A module delivery within a turma
    TurmaModulo(i64),

    /// A catalog-level course-module association
    CursoModulo(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sessao {
    pub id: i64,

    /// Set when the target is a turma-module distribution
    pub turma_modulo_id: Option<i64>,

    /// Set when the target is a course-module association
    pub curso_modulo_id: Option<i64>,

    pub sala_id: i64,
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
}

impl Sessao {
    /// The tagged target of this session. The schema CHECK guarantees exactly
    /// one of the two columns is set; a row violating that would be a store
    /// corruption and is reported as such.
    pub fn alvo(&self) -> SessaoAlvo {
        match (self.turma_modulo_id, self.curso_modulo_id) {
            (Some(id), None) => SessaoAlvo::TurmaModulo(id),
            (None, Some(id)) => SessaoAlvo::CursoModulo(id),
            _ => unreachable!("sessoes CHECK constraint violated for session {}", self.id),
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        alvo: SessaoAlvo,
        sala_id: i64,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let (turma_modulo_id, curso_modulo_id) = match alvo {
            SessaoAlvo::TurmaModulo(id) => (Some(id), None),
            SessaoAlvo::CursoModulo(id) => (None, Some(id)),
        };

        sqlx::query_as::<_, Sessao>(
            "INSERT INTO sessoes (turma_modulo_id, curso_modulo_id, sala_id, inicio, fim) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, turma_modulo_id, curso_modulo_id, sala_id, inicio, fim",
        )
        .bind(turma_modulo_id)
        .bind(curso_modulo_id)
        .bind(sala_id)
        .bind(inicio)
        .bind(fim)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sessao>(
            "SELECT id, turma_modulo_id, curso_modulo_id, sala_id, inicio, fim \
             FROM sessoes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All sessions booked in one room. Used for double-booking checks.
    pub async fn list_by_sala(pool: &SqlitePool, sala_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sessao>(
            "SELECT id, turma_modulo_id, curso_modulo_id, sala_id, inicio, fim \
             FROM sessoes WHERE sala_id = ? ORDER BY inicio ASC",
        )
        .bind(sala_id)
        .fetch_all(pool)
        .await
    }

    /// Sessions of every module distribution of one turma.
    pub async fn list_by_turma(pool: &SqlitePool, turma_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sessao>(
            "SELECT s.id, s.turma_modulo_id, s.curso_modulo_id, s.sala_id, s.inicio, s.fim \
             FROM sessoes s \
             JOIN turma_modulos tm ON tm.id = s.turma_modulo_id \
             WHERE tm.turma_id = ? ORDER BY s.inicio ASC",
        )
        .bind(turma_id)
        .fetch_all(pool)
        .await
    }

    /// Sessions taught by one trainer within `[desde, ate)`.
    pub async fn list_by_formador_range(
        pool: &SqlitePool,
        formador_id: i64,
        desde: DateTime<Utc>,
        ate: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sessao>(
            "SELECT s.id, s.turma_modulo_id, s.curso_modulo_id, s.sala_id, s.inicio, s.fim \
             FROM sessoes s \
             JOIN turma_modulos tm ON tm.id = s.turma_modulo_id \
             WHERE tm.formador_id = ? AND s.inicio >= ? AND s.inicio < ? \
             ORDER BY s.inicio ASC",
        )
        .bind(formador_id)
        .bind(desde)
        .bind(ate)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessoes WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Half-open interval overlap: `[a_inicio, a_fim)` and `[b_inicio, b_fim)`
/// overlap iff each starts before the other ends. Back-to-back sessions
/// (one ending exactly when the next starts) do not overlap.
pub fn intervalos_sobrepostos(
    a_inicio: DateTime<Utc>,
    a_fim: DateTime<Utc>,
    b_inicio: DateTime<Utc>,
    b_fim: DateTime<Utc>,
) -> bool {
    a_inicio < b_fim && b_inicio < a_fim
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn test_overlapping_intervals() {
        assert!(intervalos_sobrepostos(ts(9), ts(11), ts(10), ts(12)));
        assert!(intervalos_sobrepostos(ts(9), ts(12), ts(10), ts(11)));
        assert!(intervalos_sobrepostos(ts(10), ts(11), ts(9), ts(12)));
    }

    #[test]
    fn test_back_to_back_does_not_overlap() {
        assert!(!intervalos_sobrepostos(ts(9), ts(11), ts(11), ts(13)));
        assert!(!intervalos_sobrepostos(ts(11), ts(13), ts(9), ts(11)));
    }

    #[test]
    fn test_disjoint_does_not_overlap() {
        assert!(!intervalos_sobrepostos(ts(9), ts(10), ts(12), ts(13)));
    }

    #[test]
    fn test_alvo_round_trip() {
        let sessao = Sessao {
            id: 1,
            turma_modulo_id: Some(5),
            curso_modulo_id: None,
            sala_id: 2,
            inicio: ts(9),
            fim: ts(11),
        };
        assert_eq!(sessao.alvo(), SessaoAlvo::TurmaModulo(5));

        let catalogo = Sessao {
            turma_modulo_id: None,
            curso_modulo_id: Some(7),
            ..sessao
        };
        assert_eq!(catalogo.alvo(), SessaoAlvo::CursoModulo(7));
    }
}
