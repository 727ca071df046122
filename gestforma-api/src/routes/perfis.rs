/// Profile and user-file endpoints
///
/// # Endpoints
///
/// - `GET /v1/utilizadores` - Account directory (admin)
/// - `PUT /v1/utilizadores/:id/ativo` - Activate/deactivate an account
/// - `DELETE /v1/utilizadores/:id` - Delete (blocked while referenced)
/// - `GET /v1/formadores`, `POST /v1/perfis/formadores` - Trainer profiles
/// - `GET /v1/formandos`, `POST /v1/perfis/formandos` - Trainee profiles
/// - `DELETE /v1/formadores/:id`, `DELETE /v1/formandos/:id`
/// - `GET /v1/utilizadores/:id/ficheiros` - File metadata for a user
/// - `POST /v1/utilizadores/:id/ficheiros?nome=cv.pdf` - Upload (raw body)
/// - `GET /v1/ficheiros/:id` - Download raw bytes with stored content-type
/// - `DELETE /v1/ficheiros/:id`
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use gestforma_shared::{
    auth::middleware::AuthContext,
    models::{
        formador::Formador,
        formando::Formando,
        user::User,
        user_ficheiro::{UserFicheiro, UserFicheiroMeta},
    },
    services::perfil_service,
};
use serde::{Deserialize, Serialize};

/// Trainer profile upsert request
#[derive(Debug, Deserialize)]
pub struct FormadorProfileRequest {
    pub user_id: i64,
    pub area_especializacao: String,
}

/// Trainee profile upsert request
#[derive(Debug, Deserialize)]
pub struct FormandoProfileRequest {
    pub user_id: i64,
    pub numero_aluno: String,
    pub data_nascimento: Option<NaiveDate>,
}

/// Upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Stored filename
    pub nome: String,
}

/// Upload response (metadata only, never the content)
#[derive(Debug, Serialize)]
pub struct FicheiroResponse {
    pub id: i64,
    pub user_id: i64,
    pub nome_ficheiro: String,
    pub content_type: String,
}

/// Deleted response
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Account status request
#[derive(Debug, Deserialize)]
pub struct SetAtivoRequest {
    pub ativo: bool,
}

pub async fn list_utilizadores(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    require(&auth, auth.role.can_manage_users(), "list accounts")?;

    Ok(Json(perfil_service::list_utilizadores(&state.db).await?))
}

/// Deactivated accounts keep their data but can no longer log in.
pub async fn set_utilizador_ativo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<SetAtivoRequest>,
) -> ApiResult<Json<User>> {
    require(&auth, auth.role.can_manage_users(), "manage accounts")?;

    let user = perfil_service::set_utilizador_ativo(&state.db, id, req.ativo).await?;
    Ok(Json(user))
}

/// `409 Conflict` while a profile or stored files reference the account.
pub async fn delete_utilizador(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_users(), "manage accounts")?;

    let deleted = perfil_service::delete_utilizador(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

pub async fn list_formadores(State(state): State<AppState>) -> ApiResult<Json<Vec<Formador>>> {
    Ok(Json(perfil_service::list_formadores(&state.db).await?))
}

pub async fn list_formandos(State(state): State<AppState>) -> ApiResult<Json<Vec<Formando>>> {
    Ok(Json(perfil_service::list_formandos(&state.db).await?))
}

/// `409 Conflict` while assignments, sessions, or availability windows
/// reference the trainer.
pub async fn delete_formador(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_users(), "manage profiles")?;

    let deleted = perfil_service::delete_formador(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// `409 Conflict` while enrollments reference the trainee.
pub async fn delete_formando(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    require(&auth, auth.role.can_manage_users(), "manage profiles")?;

    let deleted = perfil_service::delete_formando(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Creates (or returns) the trainer profile of a user. Idempotent: a second
/// call with the same user answers the existing profile.
pub async fn create_formador(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<FormadorProfileRequest>,
) -> ApiResult<Json<Formador>> {
    require(&auth, auth.role.can_manage_users(), "manage profiles")?;

    let formador =
        perfil_service::get_or_create_formador(&state.db, req.user_id, &req.area_especializacao)
            .await?;
    Ok(Json(formador))
}

/// Creates (or returns) the trainee profile of a user.
pub async fn create_formando(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<FormandoProfileRequest>,
) -> ApiResult<Json<Formando>> {
    require(&auth, auth.role.can_manage_users(), "manage profiles")?;

    let formando = perfil_service::get_or_create_formando(
        &state.db,
        req.user_id,
        &req.numero_aluno,
        req.data_nascimento,
    )
    .await?;
    Ok(Json(formando))
}

pub async fn list_ficheiros(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<UserFicheiroMeta>>> {
    require(&auth, auth.is_self_or_admin(user_id), "read these files")?;

    Ok(Json(
        perfil_service::list_ficheiros_by_user(&state.db, user_id).await?,
    ))
}

/// Stores the raw request body as a file for the user.
///
/// The filename comes from the `nome` query parameter; the media type from
/// the `Content-Type` header (`application/octet-stream` when absent).
pub async fn upload_ficheiro(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<i64>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<FicheiroResponse>> {
    require(&auth, auth.is_self_or_admin(user_id), "manage these files")?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let ficheiro = perfil_service::upload_ficheiro(
        &state.db,
        user_id,
        &query.nome,
        content_type,
        body.to_vec(),
    )
    .await?;

    Ok(Json(FicheiroResponse {
        id: ficheiro.id,
        user_id: ficheiro.user_id,
        nome_ficheiro: ficheiro.nome_ficheiro,
        content_type: ficheiro.content_type,
    }))
}

/// Answers the stored bytes with the stored content-type.
pub async fn download_ficheiro(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let ficheiro: UserFicheiro = perfil_service::get_ficheiro(&state.db, id).await?;
    require(
        &auth,
        auth.is_self_or_admin(ficheiro.user_id),
        "read this file",
    )?;

    let content_type = ficheiro
        .content_type
        .parse::<axum::http::HeaderValue>()
        .map_err(|_| ApiError::InternalError("stored content-type is invalid".to_string()))?;

    let mut response = ficheiro.conteudo.into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}

pub async fn delete_ficheiro(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let ficheiro = perfil_service::get_ficheiro(&state.db, id).await?;
    require(
        &auth,
        auth.is_self_or_admin(ficheiro.user_id),
        "manage this file",
    )?;

    let deleted = perfil_service::delete_ficheiro(&state.db, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
