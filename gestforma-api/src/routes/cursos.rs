/// Catalog endpoints: areas, courses, modules, and course-module associations
///
/// # Endpoints
///
/// - `GET/POST /v1/areas`, `DELETE /v1/areas/:id`
/// - `GET/POST /v1/cursos` (`?area_id=` filters by area), `GET/DELETE /v1/cursos/:id`
/// - `GET/POST /v1/cursos/:id/modulos` - Course-module associations
/// - `POST /v1/curso-modulos/:id/confirmar` - Confirm a pending association
/// - `DELETE /v1/curso-modulos/:id`
/// - `GET/POST /v1/modulos`, `DELETE /v1/modulos/:id`
use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
    routes::require,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::{
        area::Area,
        curso::{CreateCurso, Curso},
        curso_modulo::{CreateCursoModulo, CursoModulo},
        modulo::Modulo,
    },
    services::curso_service,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create area request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAreaRequest {
    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,
}

/// List filter
#[derive(Debug, Deserialize)]
pub struct CursoListQuery {
    pub area_id: Option<i64>,
}

/// Create course request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCursoRequest {
    pub area_id: i64,

    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,

    #[validate(length(min = 1, max = 50, message = "Nivel must be 1-50 characters"))]
    pub nivel: String,
}

/// Create module request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuloRequest {
    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,

    #[validate(range(min = 1, message = "Carga horaria must be positive"))]
    pub carga_horaria: i64,
}

/// Associate-module request
#[derive(Debug, Deserialize)]
pub struct AddCursoModuloRequest {
    pub modulo_id: i64,
    pub formador_id: Option<i64>,
    pub sala_id: Option<i64>,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// State-change response
#[derive(Debug, Serialize)]
pub struct ChangedResponse {
    pub changed: bool,
}

pub async fn list_areas(State(state): State<AppState>) -> ApiResult<Json<Vec<Area>>> {
    Ok(Json(curso_service::list_areas(&state.db).await?))
}

pub async fn create_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAreaRequest>,
) -> ApiResult<Json<Area>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;
    req.validate().map_err(validation_details)?;

    Ok(Json(curso_service::create_area(&state.db, &req.nome).await?))
}

pub async fn delete_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let deleted = curso_service::delete_area(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Lists courses, optionally restricted to one area via `?area_id=`.
pub async fn list_cursos(
    State(state): State<AppState>,
    Query(query): Query<CursoListQuery>,
) -> ApiResult<Json<Vec<Curso>>> {
    let cursos = match query.area_id {
        Some(area_id) => curso_service::list_cursos_da_area(&state.db, area_id).await?,
        None => curso_service::list_cursos(&state.db).await?,
    };
    Ok(Json(cursos))
}

pub async fn get_curso(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Curso>> {
    Ok(Json(curso_service::get_curso(&state.db, id).await?))
}

pub async fn create_curso(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCursoRequest>,
) -> ApiResult<Json<Curso>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;
    req.validate().map_err(validation_details)?;

    let curso = curso_service::create_curso(
        &state.db,
        CreateCurso {
            area_id: req.area_id,
            nome: req.nome,
            nivel: req.nivel,
        },
    )
    .await?;
    Ok(Json(curso))
}

/// `409 Conflict` while turmas or module associations reference the course.
pub async fn delete_curso(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let deleted = curso_service::delete_curso(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn list_modulos(State(state): State<AppState>) -> ApiResult<Json<Vec<Modulo>>> {
    Ok(Json(curso_service::list_modulos(&state.db).await?))
}

pub async fn create_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateModuloRequest>,
) -> ApiResult<Json<Modulo>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;
    req.validate().map_err(validation_details)?;

    Ok(Json(
        curso_service::create_modulo(&state.db, &req.nome, req.carga_horaria).await?,
    ))
}

pub async fn delete_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let deleted = curso_service::delete_modulo(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn list_curso_modulos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<CursoModulo>>> {
    Ok(Json(
        curso_service::list_modulos_do_curso(&state.db, id).await?,
    ))
}

/// Associates a module with the course. `409 Conflict` on a duplicate pair.
pub async fn add_curso_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<AddCursoModuloRequest>,
) -> ApiResult<Json<CursoModulo>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let cm = curso_service::add_modulo_ao_curso(
        &state.db,
        CreateCursoModulo {
            curso_id: id,
            modulo_id: req.modulo_id,
            formador_id: req.formador_id,
            sala_id: req.sala_id,
        },
    )
    .await?;
    Ok(Json(cm))
}

pub async fn confirmar_curso_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ChangedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let changed = curso_service::confirmar_curso_modulo(&state.db, id).await?;
    Ok(Json(ChangedResponse { changed }))
}

pub async fn remove_curso_modulo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage the catalog")?;

    let deleted = curso_service::remove_curso_modulo(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
