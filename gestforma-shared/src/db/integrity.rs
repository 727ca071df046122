/// Restrictive-delete registry
///
/// Every foreign key in the schema is restrictive: a row cannot be deleted
/// while anything references it. Rather than letting SQLite raise a bare
/// constraint violation, delete operations consult this explicit registry of
/// `(entity, referencing table, fk column)` entries and answer with a typed
/// `Conflict` that names what is blocking the delete.
///
/// New tables do not inherit any behavior silently: a table that references
/// an entity must be registered here by hand, and `delete_blocked_by` is the
/// single place that decides whether a delete may proceed.
///
/// # Example
///
/// ```no_run
/// use gestforma_shared::db::integrity::ensure_deletable;
/// # async fn example(pool: sqlx::SqlitePool) -> gestforma_shared::error::DomainResult<()> {
/// // Fails with Conflict while the turma still has enrollments,
/// // module distributions, or evaluations.
/// ensure_deletable(&pool, "turmas", 7).await?;
/// sqlx::query("DELETE FROM turmas WHERE id = ?").bind(7i64).execute(&pool).await?;
/// # Ok(())
/// # }
/// ```
use crate::error::{DomainError, DomainResult};
use sqlx::SqlitePool;
use tracing::debug;

/// One registered reference: deleting from `entity` is blocked while
/// `referencing_table.fk_column` still points at the row.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePolicy {
    pub entity: &'static str,
    pub referencing_table: &'static str,
    pub fk_column: &'static str,
}

/// The complete registry. One entry per foreign key in the schema.
pub const REFERENCE_POLICIES: &[ReferencePolicy] = &[
    ReferencePolicy { entity: "users", referencing_table: "formadores", fk_column: "user_id" },
    ReferencePolicy { entity: "users", referencing_table: "formandos", fk_column: "user_id" },
    ReferencePolicy { entity: "users", referencing_table: "user_ficheiros", fk_column: "user_id" },
    ReferencePolicy { entity: "formadores", referencing_table: "curso_modulos", fk_column: "formador_id" },
    ReferencePolicy { entity: "formadores", referencing_table: "turma_modulos", fk_column: "formador_id" },
    ReferencePolicy { entity: "formadores", referencing_table: "disponibilidades", fk_column: "formador_id" },
    ReferencePolicy { entity: "formandos", referencing_table: "inscricoes", fk_column: "formando_id" },
    ReferencePolicy { entity: "areas", referencing_table: "cursos", fk_column: "area_id" },
    ReferencePolicy { entity: "cursos", referencing_table: "curso_modulos", fk_column: "curso_id" },
    ReferencePolicy { entity: "cursos", referencing_table: "turmas", fk_column: "curso_id" },
    ReferencePolicy { entity: "cursos", referencing_table: "inscricoes", fk_column: "curso_id" },
    ReferencePolicy { entity: "modulos", referencing_table: "curso_modulos", fk_column: "modulo_id" },
    ReferencePolicy { entity: "modulos", referencing_table: "turma_modulos", fk_column: "modulo_id" },
    ReferencePolicy { entity: "salas", referencing_table: "curso_modulos", fk_column: "sala_id" },
    ReferencePolicy { entity: "salas", referencing_table: "sessoes", fk_column: "sala_id" },
    ReferencePolicy { entity: "salas", referencing_table: "disponibilidades", fk_column: "sala_id" },
    ReferencePolicy { entity: "curso_modulos", referencing_table: "sessoes", fk_column: "curso_modulo_id" },
    ReferencePolicy { entity: "turmas", referencing_table: "turma_modulos", fk_column: "turma_id" },
    ReferencePolicy { entity: "turmas", referencing_table: "inscricoes", fk_column: "turma_id" },
    ReferencePolicy { entity: "turmas", referencing_table: "avaliacoes", fk_column: "turma_id" },
    ReferencePolicy { entity: "turma_modulos", referencing_table: "sessoes", fk_column: "turma_modulo_id" },
    ReferencePolicy { entity: "turma_modulos", referencing_table: "avaliacoes", fk_column: "turma_modulo_id" },
    ReferencePolicy { entity: "inscricoes", referencing_table: "avaliacoes", fk_column: "inscricao_id" },
];

/// Returns the referencing tables (with row counts) that currently block
/// deleting `id` from `entity`. Empty means the delete is safe.
pub async fn delete_blocked_by(
    pool: &SqlitePool,
    entity: &'static str,
    id: i64,
) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
    let mut blocking = Vec::new();

    for policy in REFERENCE_POLICIES.iter().filter(|p| p.entity == entity) {
        // Table and column names come from the static registry, never from input.
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?",
            policy.referencing_table, policy.fk_column
        );
        let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;

        if count > 0 {
            debug!(
                entity,
                id,
                referencing_table = policy.referencing_table,
                count,
                "Delete blocked by existing references"
            );
            blocking.push((policy.referencing_table, count));
        }
    }

    Ok(blocking)
}

/// Fails with `Conflict` if anything still references `id` in `entity`.
pub async fn ensure_deletable(
    pool: &SqlitePool,
    entity: &'static str,
    id: i64,
) -> DomainResult<()> {
    let blocking = delete_blocked_by(pool, entity, id).await?;

    if blocking.is_empty() {
        return Ok(());
    }

    let detail = blocking
        .iter()
        .map(|(table, count)| format!("{} row(s) in {}", count, table))
        .collect::<Vec<_>>()
        .join(", ");

    Err(DomainError::Conflict(format!(
        "cannot delete {} {}: referenced by {}",
        entity, id, detail
    )))
}
