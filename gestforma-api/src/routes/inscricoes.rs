/// Enrollment endpoints
///
/// # Endpoints
///
/// - `GET /v1/turmas/:id/inscricoes` - Enrollments of a class
/// - `POST /v1/turmas/:id/inscricoes` - Enroll a trainee
/// - `POST /v1/inscricoes/:id/desistir` - Trainee drops out (soft state change)
/// - `POST /v1/inscricoes/:id/concluir` - Mark completed
/// - `DELETE /v1/inscricoes/:id` - Hard delete (admin-class only)
/// - `GET /v1/formandos/:id/inscricoes` - Enrollments of a trainee
use crate::{app::AppState, error::ApiResult, routes::require};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use gestforma_shared::{
    auth::middleware::AuthContext, models::inscricao::Inscricao, services::inscricao_service,
};
use serde::{Deserialize, Serialize};

/// Enroll request
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub formando_id: i64,
    pub curso_id: i64,
}

/// State-change response
#[derive(Debug, Serialize)]
pub struct ChangedResponse {
    pub changed: bool,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn list_by_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Inscricao>>> {
    Ok(Json(inscricao_service::list_by_turma(&state.db, id).await?))
}

pub async fn list_by_formando(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Inscricao>>> {
    Ok(Json(
        inscricao_service::list_by_formando(&state.db, id).await?,
    ))
}

/// Enrolls a trainee in the class. `409 Conflict` on re-enrollment,
/// `422` when the course does not match the class.
pub async fn enroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<EnrollRequest>,
) -> ApiResult<Json<Inscricao>> {
    require(&auth, auth.role.can_manage_enrollments(), "manage enrollments")?;

    let inscricao =
        inscricao_service::enroll(&state.db, id, req.formando_id, req.curso_id).await?;
    Ok(Json(inscricao))
}

/// Marks an active enrollment as dropped. The row survives for history.
///
/// Trainees may drop their own enrollment; management roles any.
pub async fn desistir(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ChangedResponse>> {
    let inscricao = inscricao_service::get_inscricao(&state.db, id).await?;
    let own = auth.formando_id == Some(inscricao.formando_id);
    require(
        &auth,
        own || auth.role.can_manage_enrollments(),
        "change this enrollment",
    )?;

    let changed = inscricao_service::unenroll(&state.db, id).await?;
    Ok(Json(ChangedResponse { changed }))
}

pub async fn concluir(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ChangedResponse>> {
    require(&auth, auth.role.can_manage_enrollments(), "manage enrollments")?;

    let changed = inscricao_service::conclude(&state.db, id).await?;
    Ok(Json(ChangedResponse { changed }))
}

/// Hard delete, for correcting mistakes. Blocked while grades reference the
/// enrollment.
pub async fn delete_inscricao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.is_admin_class(), "delete enrollments")?;

    let deleted = inscricao_service::delete_inscricao(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
