/// Grade endpoints
///
/// # Endpoints
///
/// - `GET /v1/turmas/:id/avaliacoes` - Grades recorded in a class
/// - `POST /v1/turmas/:id/avaliacoes` - Record a grade
/// - `PUT /v1/avaliacoes/:id` - Update a grade
/// - `DELETE /v1/avaliacoes/:id` - Delete a grade
/// - `GET /v1/formandos/:id/avaliacoes` - Grades of a trainee
///
/// The write gate lives in the service: admin-class roles always pass, a
/// trainer only for distributions assigned to them.
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::avaliacao::Avaliacao,
    services::avaliacao_service::{self, RecordGradeInput},
};
use serde::{Deserialize, Serialize};

/// Record grade request
#[derive(Debug, Deserialize)]
pub struct RecordGradeRequest {
    pub inscricao_id: i64,
    pub turma_modulo_id: i64,
    pub nota: f64,
    pub observacoes: Option<String>,
}

/// Update grade request
#[derive(Debug, Deserialize)]
pub struct UpdateGradeRequest {
    pub nota: f64,
    pub observacoes: Option<String>,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn list_by_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Avaliacao>>> {
    Ok(Json(
        avaliacao_service::get_notas_by_turma(&state.db, id).await?,
    ))
}

pub async fn list_by_formando(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Avaliacao>>> {
    Ok(Json(
        avaliacao_service::get_notas_by_formando(&state.db, id).await?,
    ))
}

/// Records a grade (0-20) for an enrollment on a module distribution.
pub async fn record_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<RecordGradeRequest>,
) -> ApiResult<Json<Avaliacao>> {
    let avaliacao = avaliacao_service::record_grade(
        &state.db,
        &auth,
        RecordGradeInput {
            turma_id: id,
            inscricao_id: req.inscricao_id,
            turma_modulo_id: req.turma_modulo_id,
            nota: req.nota,
            observacoes: req.observacoes,
        },
    )
    .await?;

    Ok(Json(avaliacao))
}

pub async fn update_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGradeRequest>,
) -> ApiResult<Json<Avaliacao>> {
    let avaliacao =
        avaliacao_service::update_grade(&state.db, &auth, id, req.nota, req.observacoes).await?;
    Ok(Json(avaliacao))
}

pub async fn delete_grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = avaliacao_service::delete_grade(&state.db, &auth, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
