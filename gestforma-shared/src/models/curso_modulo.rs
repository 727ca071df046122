/// Course-module association model
///
/// Links a course to one of its modules, with the default trainer and room
/// for that pairing. New associations start in state `Pendente` until the
/// office confirms the assignment.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Association state. Persisted as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum CursoModuloEstado {
    Pendente,
    Confirmado,
}

impl CursoModuloEstado {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursoModuloEstado::Pendente => "Pendente",
            CursoModuloEstado::Confirmado => "Confirmado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CursoModulo {
    pub id: i64,
    pub curso_id: i64,
    pub modulo_id: i64,

    /// Default trainer for this pairing, if one was assigned
    pub formador_id: Option<i64>,

    /// Default room for this pairing, if one was assigned
    pub sala_id: Option<i64>,

    pub estado: CursoModuloEstado,
}

#[derive(Debug, Clone)]
pub struct CreateCursoModulo {
    pub curso_id: i64,
    pub modulo_id: i64,
    pub formador_id: Option<i64>,
    pub sala_id: Option<i64>,
}

impl CursoModulo {
    pub async fn create(pool: &SqlitePool, data: CreateCursoModulo) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CursoModulo>(
            "INSERT INTO curso_modulos (curso_id, modulo_id, formador_id, sala_id, estado) \
             VALUES (?, ?, ?, ?, 'Pendente') \
             RETURNING id, curso_id, modulo_id, formador_id, sala_id, estado",
        )
        .bind(data.curso_id)
        .bind(data.modulo_id)
        .bind(data.formador_id)
        .bind(data.sala_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CursoModulo>(
            "SELECT id, curso_id, modulo_id, formador_id, sala_id, estado \
             FROM curso_modulos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_curso(pool: &SqlitePool, curso_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CursoModulo>(
            "SELECT id, curso_id, modulo_id, formador_id, sala_id, estado \
             FROM curso_modulos WHERE curso_id = ? ORDER BY id ASC",
        )
        .bind(curso_id)
        .fetch_all(pool)
        .await
    }

    pub async fn set_estado(
        pool: &SqlitePool,
        id: i64,
        estado: CursoModuloEstado,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE curso_modulos SET estado = ? WHERE id = ?")
            .bind(estado)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM curso_modulos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
