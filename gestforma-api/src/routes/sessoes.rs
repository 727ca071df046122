/// Session (scheduled lesson) endpoints
///
/// # Endpoints
///
/// - `GET /v1/sessoes?turma_id=1` - Sessions of a class
/// - `GET /v1/sessoes?formador_id=1&desde=...&ate=...` - Trainer agenda
/// - `POST /v1/sessoes` - Schedule a session (room double-booking rejected)
/// - `DELETE /v1/sessoes/:id` - Cancel a session
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
    models::sessao::{Sessao, SessaoAlvo},
    services::sessao_service,
};
use serde::{Deserialize, Serialize};

/// Create session request. `alvo` is the tagged target:
/// `{"tipo": "turma_modulo", "id": 3}` or `{"tipo": "curso_modulo", "id": 5}`.
#[derive(Debug, Deserialize)]
pub struct CreateSessaoRequest {
    pub alvo: SessaoAlvo,
    pub sala_id: i64,
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
}

/// Session list filter. Exactly one of `turma_id` / `formador_id`; the date
/// range is required with `formador_id`.
#[derive(Debug, Deserialize)]
pub struct SessaoQuery {
    pub turma_id: Option<i64>,
    pub formador_id: Option<i64>,
    pub desde: Option<DateTime<Utc>>,
    pub ate: Option<DateTime<Utc>>,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn list_sessoes(
    State(state): State<AppState>,
    Query(query): Query<SessaoQuery>,
) -> ApiResult<Json<Vec<Sessao>>> {
    match (query.turma_id, query.formador_id) {
        (Some(turma_id), None) => Ok(Json(
            sessao_service::list_by_turma(&state.db, turma_id).await?,
        )),
        (None, Some(formador_id)) => {
            let (desde, ate) = match (query.desde, query.ate) {
                (Some(desde), Some(ate)) => (desde, ate),
                _ => {
                    return Err(ApiError::BadRequest(
                        "formador_id queries require desde and ate".to_string(),
                    ))
                }
            };
            Ok(Json(
                sessao_service::list_by_formador(&state.db, formador_id, desde, ate).await?,
            ))
        }
        _ => Err(ApiError::BadRequest(
            "provide exactly one of turma_id or formador_id".to_string(),
        )),
    }
}

/// Schedules a session. `409 Conflict` when the room is already booked for an
/// overlapping window.
pub async fn create_sessao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateSessaoRequest>,
) -> ApiResult<Json<Sessao>> {
    require(&auth, auth.role.can_manage_catalog(), "schedule sessions")?;

    let sessao =
        sessao_service::create_sessao(&state.db, req.alvo, req.sala_id, req.inicio, req.fim)
            .await?;
    Ok(Json(sessao))
}

pub async fn delete_sessao(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_catalog(), "schedule sessions")?;

    let deleted = sessao_service::delete_sessao(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
