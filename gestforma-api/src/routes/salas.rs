/// Room endpoints
///
/// # Endpoints
///
/// - `GET /v1/salas` - List rooms
/// - `POST /v1/salas` - Create a room
/// - `GET /v1/salas/:id` - Fetch one room
/// - `DELETE /v1/salas/:id` - Delete (blocked while referenced)
use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
    routes::require,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::sala::{CreateSala, Sala, SalaTipo},
    services::sala_service,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSalaRequest {
    #[validate(length(min = 1, max = 100, message = "Nome must be 1-100 characters"))]
    pub nome: String,

    #[validate(range(min = 1, message = "Capacidade must be positive"))]
    pub capacidade: i64,

    pub tipo: SalaTipo,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn list_salas(State(state): State<AppState>) -> ApiResult<Json<Vec<Sala>>> {
    Ok(Json(sala_service::list_salas(&state.db).await?))
}

pub async fn get_sala(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Sala>> {
    Ok(Json(sala_service::get_sala(&state.db, id).await?))
}

pub async fn create_sala(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateSalaRequest>,
) -> ApiResult<Json<Sala>> {
    require(&auth, auth.role.can_manage_catalog(), "manage salas")?;
    req.validate().map_err(validation_details)?;

    let sala = sala_service::create_sala(
        &state.db,
        CreateSala {
            nome: req.nome,
            capacidade: req.capacidade,
            tipo: req.tipo,
        },
    )
    .await?;
    Ok(Json(sala))
}

/// `409 Conflict` while sessions, availabilities, or course-module
/// associations reference the room.
pub async fn delete_sala(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "manage salas")?;

    let deleted = sala_service::delete_sala(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
