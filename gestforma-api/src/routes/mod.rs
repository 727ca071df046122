/// API route handlers
///
/// Handlers are thin: parse and validate the request, check the caller's
/// role, call the matching domain service, map the result.
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh, password reset
/// - `turmas`: Classes and their module distributions
/// - `inscricoes`: Enrollments
/// - `avaliacoes`: Grades
/// - `sessoes`: Scheduled sessions
/// - `disponibilidades`: Availability windows
/// - `salas`: Rooms
/// - `cursos`: Catalog (areas, courses, modules, associations)
/// - `perfis`: Trainer/trainee profiles and user files
use crate::error::ApiError;
use gestforma_shared::auth::middleware::AuthContext;

/// Role gate shared by the management handlers. `allowed` comes from one of
/// the `Role::can_*` predicates.
pub(crate) fn require(auth: &AuthContext, allowed: bool, action: &str) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "role {} may not {}",
            auth.role.as_str(),
            action
        )))
    }
}

pub mod auth;
pub mod avaliacoes;
pub mod cursos;
pub mod disponibilidades;
pub mod health;
pub mod inscricoes;
pub mod perfis;
pub mod salas;
pub mod sessoes;
pub mod turmas;
