/// Evaluation service
///
/// Grade writes are role-gated: admin-class roles may always write, a
/// formador only for module distributions assigned to them. The ownership
/// check reads the formador-id claim from the caller's `AuthContext` — the
/// token is the authorization source of truth here.
use crate::{
    auth::middleware::AuthContext,
    error::{DomainError, DomainResult},
    models::{
        avaliacao::{Avaliacao, CreateAvaliacao},
        formando::Formando,
        inscricao::Inscricao,
        turma::Turma,
        turma_modulo::TurmaModulo,
        user::Role,
    },
};
use sqlx::SqlitePool;
use tracing::info;

/// Grades use the Portuguese 0-20 scale.
const NOTA_MIN: f64 = 0.0;
const NOTA_MAX: f64 = 20.0;

/// Input for recording a grade.
#[derive(Debug, Clone)]
pub struct RecordGradeInput {
    pub turma_id: i64,
    pub inscricao_id: i64,
    pub turma_modulo_id: i64,
    pub nota: f64,
    pub observacoes: Option<String>,
}

fn validate_nota(nota: f64) -> DomainResult<()> {
    if !(NOTA_MIN..=NOTA_MAX).contains(&nota) {
        return Err(DomainError::Validation(format!(
            "nota must be between {} and {}",
            NOTA_MIN, NOTA_MAX
        )));
    }
    Ok(())
}

/// The write gate: admin-class roles pass, a formador passes only when the
/// distribution is assigned to them.
fn ensure_can_grade(actor: &AuthContext, turma_modulo: &TurmaModulo) -> DomainResult<()> {
    if actor.role.can_override_grades() {
        return Ok(());
    }

    if actor.role == Role::Formador && actor.formador_id == Some(turma_modulo.formador_id) {
        return Ok(());
    }

    Err(DomainError::Authorization(format!(
        "user {} may not grade turma_modulo {}",
        actor.user_id, turma_modulo.id
    )))
}

/// Records a grade for an enrollment on a module distribution.
///
/// # Errors
///
/// - `Validation` on an out-of-range nota or mismatched turma references
/// - `NotFound` when turma, inscricao, or turma_modulo do not exist
/// - `Authorization` when the actor fails the role/ownership gate
pub async fn record_grade(
    pool: &SqlitePool,
    actor: &AuthContext,
    input: RecordGradeInput,
) -> DomainResult<Avaliacao> {
    validate_nota(input.nota)?;

    if Turma::find_by_id(pool, input.turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", input.turma_id));
    }

    let inscricao = Inscricao::find_by_id(pool, input.inscricao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("inscricao", input.inscricao_id))?;
    if inscricao.turma_id != input.turma_id {
        return Err(DomainError::Validation(format!(
            "inscricao {} does not belong to turma {}",
            input.inscricao_id, input.turma_id
        )));
    }

    let turma_modulo = TurmaModulo::find_by_id(pool, input.turma_modulo_id)
        .await?
        .ok_or_else(|| DomainError::not_found("turma_modulo", input.turma_modulo_id))?;
    if turma_modulo.turma_id != input.turma_id {
        return Err(DomainError::Validation(format!(
            "turma_modulo {} does not belong to turma {}",
            input.turma_modulo_id, input.turma_id
        )));
    }

    ensure_can_grade(actor, &turma_modulo)?;

    let avaliacao = Avaliacao::create(
        pool,
        CreateAvaliacao {
            turma_id: input.turma_id,
            inscricao_id: input.inscricao_id,
            turma_modulo_id: input.turma_modulo_id,
            nota: input.nota,
            observacoes: input.observacoes,
        },
    )
    .await?;

    info!(
        avaliacao_id = avaliacao.id,
        actor_user_id = actor.user_id,
        "Grade recorded"
    );
    Ok(avaliacao)
}

/// Updates a grade's value and notes. Same gate as `record_grade`.
pub async fn update_grade(
    pool: &SqlitePool,
    actor: &AuthContext,
    avaliacao_id: i64,
    nota: f64,
    observacoes: Option<String>,
) -> DomainResult<Avaliacao> {
    validate_nota(nota)?;

    let avaliacao = Avaliacao::find_by_id(pool, avaliacao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("avaliacao", avaliacao_id))?;

    let turma_modulo = TurmaModulo::find_by_id(pool, avaliacao.turma_modulo_id)
        .await?
        .ok_or_else(|| DomainError::not_found("turma_modulo", avaliacao.turma_modulo_id))?;

    ensure_can_grade(actor, &turma_modulo)?;

    let updated = Avaliacao::update_nota(pool, avaliacao_id, nota, observacoes)
        .await?
        .ok_or_else(|| DomainError::not_found("avaliacao", avaliacao_id))?;

    info!(avaliacao_id, actor_user_id = actor.user_id, "Grade updated");
    Ok(updated)
}

/// Deletes a grade. Same gate as `record_grade`.
pub async fn delete_grade(
    pool: &SqlitePool,
    actor: &AuthContext,
    avaliacao_id: i64,
) -> DomainResult<bool> {
    let avaliacao = Avaliacao::find_by_id(pool, avaliacao_id)
        .await?
        .ok_or_else(|| DomainError::not_found("avaliacao", avaliacao_id))?;

    let turma_modulo = TurmaModulo::find_by_id(pool, avaliacao.turma_modulo_id)
        .await?
        .ok_or_else(|| DomainError::not_found("turma_modulo", avaliacao.turma_modulo_id))?;

    ensure_can_grade(actor, &turma_modulo)?;

    let deleted = Avaliacao::delete(pool, avaliacao_id).await?;
    info!(avaliacao_id, actor_user_id = actor.user_id, "Grade deleted");
    Ok(deleted)
}

pub async fn get_notas_by_turma(pool: &SqlitePool, turma_id: i64) -> DomainResult<Vec<Avaliacao>> {
    if Turma::find_by_id(pool, turma_id).await?.is_none() {
        return Err(DomainError::not_found("turma", turma_id));
    }
    Ok(Avaliacao::list_by_turma(pool, turma_id).await?)
}

pub async fn get_notas_by_formando(
    pool: &SqlitePool,
    formando_id: i64,
) -> DomainResult<Vec<Avaliacao>> {
    if Formando::find_by_id(pool, formando_id).await?.is_none() {
        return Err(DomainError::not_found("formando", formando_id));
    }
    Ok(Avaliacao::list_by_formando(pool, formando_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, formador_id: Option<i64>) -> AuthContext {
        AuthContext {
            user_id: 1,
            role,
            formador_id,
            formando_id: None,
        }
    }

    fn distribution(formador_id: i64) -> TurmaModulo {
        TurmaModulo {
            id: 10,
            turma_id: 1,
            modulo_id: 2,
            formador_id,
            sequencia: 1,
        }
    }

    #[test]
    fn test_admin_class_passes_gate() {
        assert!(ensure_can_grade(&actor(Role::Admin, None), &distribution(3)).is_ok());
        assert!(ensure_can_grade(&actor(Role::SuperAdmin, None), &distribution(3)).is_ok());
    }

    #[test]
    fn test_assigned_formador_passes_gate() {
        assert!(ensure_can_grade(&actor(Role::Formador, Some(3)), &distribution(3)).is_ok());
    }

    #[test]
    fn test_unassigned_formador_fails_gate() {
        let result = ensure_can_grade(&actor(Role::Formador, Some(4)), &distribution(3));
        assert!(matches!(result, Err(DomainError::Authorization(_))));
    }

    #[test]
    fn test_secretaria_and_formando_fail_gate() {
        assert!(ensure_can_grade(&actor(Role::Secretaria, None), &distribution(3)).is_err());
        assert!(ensure_can_grade(&actor(Role::Formando, None), &distribution(3)).is_err());
    }

    #[test]
    fn test_nota_range() {
        assert!(validate_nota(0.0).is_ok());
        assert!(validate_nota(20.0).is_ok());
        assert!(validate_nota(-0.5).is_err());
        assert!(validate_nota(20.5).is_err());
    }
}
