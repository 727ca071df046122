/// Availability endpoints
///
/// # Endpoints
///
/// - `GET /v1/disponibilidades?formador_id=1&desde=...&ate=...` - Trainer windows
/// - `GET /v1/disponibilidades?sala_id=1&desde=...&ate=...` - Room windows
/// - `POST /v1/disponibilidades` - Declare a window
/// - `DELETE /v1/disponibilidades/:id` - Remove a window
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::disponibilidade::{Disponibilidade, DisponibilidadeAlvo},
    services::disponibilidade_service,
};
use serde::{Deserialize, Serialize};

/// Declare-window request. `alvo` is the tagged subject:
/// `{"tipo": "formador", "id": 1}` or `{"tipo": "sala", "id": 2}`.
#[derive(Debug, Deserialize)]
pub struct CreateDisponibilidadeRequest {
    pub alvo: DisponibilidadeAlvo,
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,

    /// False marks the window as blocked rather than available
    #[serde(default = "default_disponivel")]
    pub disponivel: bool,
}

fn default_disponivel() -> bool {
    true
}

/// Window list filter. Exactly one of `formador_id` / `sala_id`.
#[derive(Debug, Deserialize)]
pub struct DisponibilidadeQuery {
    pub formador_id: Option<i64>,
    pub sala_id: Option<i64>,
    pub desde: DateTime<Utc>,
    pub ate: DateTime<Utc>,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn list_disponibilidades(
    State(state): State<AppState>,
    Query(query): Query<DisponibilidadeQuery>,
) -> ApiResult<Json<Vec<Disponibilidade>>> {
    match (query.formador_id, query.sala_id) {
        (Some(formador_id), None) => Ok(Json(
            disponibilidade_service::list_by_formador(
                &state.db,
                formador_id,
                query.desde,
                query.ate,
            )
            .await?,
        )),
        (None, Some(sala_id)) => Ok(Json(
            disponibilidade_service::list_by_sala(&state.db, sala_id, query.desde, query.ate)
                .await?,
        )),
        _ => Err(ApiError::BadRequest(
            "provide exactly one of formador_id or sala_id".to_string(),
        )),
    }
}

/// Declares an availability (or blocked) window for a trainer or room.
///
/// Trainers may declare their own windows; management roles any.
pub async fn create_disponibilidade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateDisponibilidadeRequest>,
) -> ApiResult<Json<Disponibilidade>> {
    let own = matches!(req.alvo, DisponibilidadeAlvo::Formador(id) if auth.formador_id == Some(id));
    require(
        &auth,
        own || auth.role.can_manage_catalog(),
        "manage this availability",
    )?;

    let disponibilidade = disponibilidade_service::create_disponibilidade(
        &state.db,
        req.alvo,
        req.inicio,
        req.fim,
        req.disponivel,
    )
    .await?;
    Ok(Json(disponibilidade))
}

pub async fn delete_disponibilidade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let existing = disponibilidade_service::get_disponibilidade(&state.db, id).await?;
    let own = matches!(existing.alvo(), DisponibilidadeAlvo::Formador(fid) if auth.formador_id == Some(fid));
    require(
        &auth,
        own || auth.role.can_manage_catalog(),
        "manage this availability",
    )?;

    let deleted = disponibilidade_service::delete_disponibilidade(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
