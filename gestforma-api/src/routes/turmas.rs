/// Class (turma) endpoints
///
/// # Endpoints
///
/// - `GET /v1/turmas` - List classes (`?curso_id=` filters by course)
/// - `POST /v1/turmas` - Create a class
/// - `GET /v1/turmas/:id` - Fetch one class
/// - `DELETE /v1/turmas/:id` - Delete (blocked while referenced)
/// - `GET /v1/turmas/:id/modulos` - Module distributions in delivery order
/// - `POST /v1/turmas/:id/modulos` - Assign a module to the class
/// - `DELETE /v1/turma-modulos/:id` - Remove a distribution
/// - `GET /v1/formadores/:id/turma-modulos` - One trainer's assignments
use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
    routes::require,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::{
        turma::{CreateTurma, Turma},
        turma_modulo::TurmaModulo,
    },
    services::turma_service,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create turma request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTurmaRequest {
    pub curso_id: i64,

    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,

    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Local must be 1-100 characters"))]
    pub local: String,
}

/// Assign-module request
#[derive(Debug, Deserialize)]
pub struct AddTurmaModuloRequest {
    pub modulo_id: i64,
    pub formador_id: i64,
    pub sequencia: i64,
}

/// List filter
#[derive(Debug, Deserialize)]
pub struct TurmaListQuery {
    pub curso_id: Option<i64>,
}

/// Generic deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Lists classes, optionally restricted to one course via `?curso_id=`.
pub async fn list_turmas(
    State(state): State<AppState>,
    Query(query): Query<TurmaListQuery>,
) -> ApiResult<Json<Vec<Turma>>> {
    let turmas = match query.curso_id {
        Some(curso_id) => turma_service::list_turmas_do_curso(&state.db, curso_id).await?,
        None => turma_service::list_turmas(&state.db).await?,
    };
    Ok(Json(turmas))
}

/// Module distributions assigned to one trainer, across all classes.
pub async fn list_formador_modulos(
    State(state): State<AppState>,
    Path(formador_id): Path<i64>,
) -> ApiResult<Json<Vec<TurmaModulo>>> {
    Ok(Json(
        turma_service::list_modulos_do_formador(&state.db, formador_id).await?,
    ))
}

pub async fn get_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Turma>> {
    Ok(Json(turma_service::get_turma(&state.db, id).await?))
}

/// Creates a class for a course. Management roles only.
pub async fn create_turma(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTurmaRequest>,
) -> ApiResult<Json<Turma>> {
    require(&auth, auth.role.can_manage_catalog(), "manage turmas")?;
    req.validate().map_err(validation_details)?;

    let turma = turma_service::create_turma(
        &state.db,
        CreateTurma {
            curso_id: req.curso_id,
            nome: req.nome,
            data_inicio: req.data_inicio,
            data_fim: req.data_fim,
            local: req.local,
        },
    )
    .await?;

    Ok(Json(turma))
}

/// Deletes a class. `409 Conflict` while enrollments or distributions
/// reference it.
pub async fn delete_turma(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage turmas")?;

    let deleted = turma_service::delete_turma(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn list_turma_modulos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TurmaModulo>>> {
    Ok(Json(
        turma_service::list_modulos_da_turma(&state.db, id).await?,
    ))
}

/// Assigns a module (with trainer and sequence) to the class.
///
/// `409 Conflict` when the class already delivers that module.
pub async fn add_turma_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<AddTurmaModuloRequest>,
) -> ApiResult<Json<TurmaModulo>> {
    require(&auth, auth.role.can_manage_catalog(), "manage turmas")?;

    let tm = turma_service::add_modulo(
        &state.db,
        id,
        req.modulo_id,
        req.formador_id,
        req.sequencia,
    )
    .await?;

    Ok(Json(tm))
}

pub async fn remove_turma_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage turmas")?;

    let deleted = turma_service::remove_modulo(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
