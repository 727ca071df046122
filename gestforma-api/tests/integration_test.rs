/// Integration tests for the GestForma API
///
/// Each test runs against its own in-memory SQLite database through the full
/// router, token middleware included.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{register_formador, register_formando, seed_catalog, TestContext};
use gestforma_shared::models::{
    area::Area, curso::Curso, formador::Formador, formando::Formando, inscricao::Inscricao,
    modulo::Modulo, turma::Turma, turma_modulo::TurmaModulo, user::User,
};
use gestforma_shared::seed;
use serde_json::json;
use tower::Service as _;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/v1/turmas", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/v1/turmas", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "email": "Maria.Silva@Test.PT",
                "password": "maria-pass-123",
                "nome": "Maria Silva"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    // Stored lowercased
    let user = User::find_by_email(&ctx.db, "maria.silva@test.pt")
        .await
        .unwrap()
        .expect("stored user");
    assert_eq!(user.email, "maria.silva@test.pt");

    // Login with a different casing reaches the same account
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "email": "MARIA.SILVA@TEST.PT",
                "password": "maria-pass-123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Re-registration under another casing is a duplicate
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "email": "maria.silva@TEST.pt",
                "password": "other-pass-123",
                "nome": "Maria Outra"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "admin@test.pt", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_pw_message = body["message"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@test.pt", "password": "whatever-123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same message for both failures: the endpoint must not reveal which
    // emails exist.
    assert_eq!(body["message"].as_str().unwrap(), wrong_pw_message);
}

#[tokio::test]
async fn test_duplicate_enrollment_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_id, _) = register_formador(&ctx, "f1@test.pt").await;
    let (_, formando_id, _) = register_formando(&ctx, "a1@test.pt", "F001").await;

    let (status, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let turma_id = turma["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/modulos"),
            json!({ "modulo_id": modulo_id, "formador_id": formador_id, "sequencia": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let enroll = json!({ "formando_id": formando_id, "curso_id": curso_id });
    let (status, _) = ctx
        .post(&format!("/v1/turmas/{turma_id}/inscricoes"), enroll.clone())
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .post(&format!("/v1/turmas/{turma_id}/inscricoes"), enroll)
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
}

#[tokio::test]
async fn test_enrollment_requires_matching_curso() {
    let ctx = TestContext::new().await.unwrap();
    let (area_id, curso_id, _) = seed_catalog(&ctx).await;
    let (_, formando_id, _) = register_formando(&ctx, "a1@test.pt", "F001").await;

    let (_, outro_curso) = ctx
        .post(
            "/v1/cursos",
            json!({ "area_id": area_id, "nome": "Outro Curso", "nivel": "Nivel 2" }),
        )
        .await;
    let outro_curso_id = outro_curso["id"].as_i64().unwrap();

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/inscricoes"),
            json!({ "formando_id": formando_id, "curso_id": outro_curso_id }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_turma_delete_blocked_while_referenced() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_id, _) = register_formador(&ctx, "f1@test.pt").await;
    let (_, formando_id, _) = register_formando(&ctx, "a1@test.pt", "F001").await;

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (_, tm) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/modulos"),
            json!({ "modulo_id": modulo_id, "formador_id": formador_id, "sequencia": 1 }),
        )
        .await;
    let tm_id = tm["id"].as_i64().unwrap();

    let (_, inscricao) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/inscricoes"),
            json!({ "formando_id": formando_id, "curso_id": curso_id }),
        )
        .await;
    let inscricao_id = inscricao["id"].as_i64().unwrap();

    // Blocked while the distribution and the enrollment exist
    let (status, _) = ctx.delete(&format!("/v1/turmas/{turma_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx.delete(&format!("/v1/inscricoes/{inscricao_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.delete(&format!("/v1/turma-modulos/{tm_id}")).await;
    assert_eq!(status, StatusCode::OK);

    // Now deletable
    let (status, _) = ctx.delete(&format!("/v1/turmas/{turma_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_grade_gate_assigned_trainer_only() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_a, token_a) = register_formador(&ctx, "a@test.pt").await;
    let (_, _formador_b, token_b) = register_formador(&ctx, "b@test.pt").await;
    let (_, formando_id, _) = register_formando(&ctx, "x@test.pt", "F001").await;

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (_, tm) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/modulos"),
            json!({ "modulo_id": modulo_id, "formador_id": formador_a, "sequencia": 1 }),
        )
        .await;
    let tm_id = tm["id"].as_i64().unwrap();

    let (_, inscricao) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/inscricoes"),
            json!({ "formando_id": formando_id, "curso_id": curso_id }),
        )
        .await;
    let inscricao_id = inscricao["id"].as_i64().unwrap();

    let grade = json!({
        "inscricao_id": inscricao_id,
        "turma_modulo_id": tm_id,
        "nota": 15.5,
        "observacoes": "Bom trabalho"
    });

    // Trainer B is not assigned to this distribution
    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/turmas/{turma_id}/avaliacoes"),
            Some(&token_b),
            Some(grade.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Trainer A is
    let (status, avaliacao) = ctx
        .request(
            "POST",
            &format!("/v1/turmas/{turma_id}/avaliacoes"),
            Some(&token_a),
            Some(grade),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", avaliacao);
    let avaliacao_id = avaliacao["id"].as_i64().unwrap();

    // Admin overrides regardless of assignment
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/v1/avaliacoes/{avaliacao_id}"),
            Some(&ctx.admin_token),
            Some(json!({ "nota": 16.0, "observacoes": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_nota_out_of_range_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_id, _) = register_formador(&ctx, "f@test.pt").await;
    let (_, formando_id, _) = register_formando(&ctx, "x@test.pt", "F001").await;

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (_, tm) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/modulos"),
            json!({ "modulo_id": modulo_id, "formador_id": formador_id, "sequencia": 1 }),
        )
        .await;

    let (_, inscricao) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/inscricoes"),
            json!({ "formando_id": formando_id, "curso_id": curso_id }),
        )
        .await;

    let (status, _) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/avaliacoes"),
            json!({
                "inscricao_id": inscricao["id"],
                "turma_modulo_id": tm["id"],
                "nota": 25.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_room_double_booking_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_id, _) = register_formador(&ctx, "f@test.pt").await;

    let (_, sala) = ctx
        .post(
            "/v1/salas",
            json!({ "nome": "Sala 1.01", "capacidade": 20, "tipo": "Teorica" }),
        )
        .await;
    let sala_id = sala["id"].as_i64().unwrap();

    let (_, lab) = ctx
        .post(
            "/v1/salas",
            json!({ "nome": "Lab 2", "capacidade": 25, "tipo": "Informatica" }),
        )
        .await;
    let lab_id = lab["id"].as_i64().unwrap();

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (_, tm) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/modulos"),
            json!({ "modulo_id": modulo_id, "formador_id": formador_id, "sequencia": 1 }),
        )
        .await;
    let tm_id = tm["id"].as_i64().unwrap();

    let alvo = json!({ "tipo": "turma_modulo", "id": tm_id });

    let (status, _) = ctx
        .post(
            "/v1/sessoes",
            json!({
                "alvo": alvo.clone(),
                "sala_id": lab_id,
                "inicio": "2024-10-01T09:00:00Z",
                "fim": "2024-10-01T11:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Overlapping window in the same room
    let (status, _) = ctx
        .post(
            "/v1/sessoes",
            json!({
                "alvo": alvo.clone(),
                "sala_id": lab_id,
                "inicio": "2024-10-01T10:00:00Z",
                "fim": "2024-10-01T12:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same window in another room is fine
    let (status, _) = ctx
        .post(
            "/v1/sessoes",
            json!({
                "alvo": alvo.clone(),
                "sala_id": sala_id,
                "inicio": "2024-10-01T10:00:00Z",
                "fim": "2024-10-01T12:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Back-to-back in the original room is fine (half-open intervals)
    let (status, _) = ctx
        .post(
            "/v1/sessoes",
            json!({
                "alvo": alvo.clone(),
                "sala_id": lab_id,
                "inicio": "2024-10-01T11:00:00Z",
                "fim": "2024-10-01T13:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_formando_can_drop_own_enrollment() {
    let ctx = TestContext::new().await.unwrap();
    let (_, curso_id, _) = seed_catalog(&ctx).await;
    let (_, formando_id, token) = register_formando(&ctx, "x@test.pt", "F001").await;

    let (_, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-A",
                "data_inicio": "2024-09-16",
                "data_fim": "2025-06-27",
                "local": "Lisboa"
            }),
        )
        .await;
    let turma_id = turma["id"].as_i64().unwrap();

    let (_, inscricao) = ctx
        .post(
            &format!("/v1/turmas/{turma_id}/inscricoes"),
            json!({ "formando_id": formando_id, "curso_id": curso_id }),
        )
        .await;
    let inscricao_id = inscricao["id"].as_i64().unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/inscricoes/{inscricao_id}/desistir"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The row survives with the dropped state
    let stored = Inscricao::find_by_id(&ctx.db, inscricao_id)
        .await
        .unwrap()
        .expect("kept for history");
    assert_eq!(
        serde_json::to_value(stored.estado).unwrap(),
        json!("Desistiu")
    );

    // Dropping twice is a conflict: it is no longer active
    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/inscricoes/{inscricao_id}/desistir"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_formando_cannot_manage_catalog() {
    let ctx = TestContext::new().await.unwrap();
    let (_, _, token) = register_formando(&ctx, "x@test.pt", "F001").await;

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/areas",
            Some(&token),
            Some(json!({ "nome": "Gestao" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();

    seed::run(&ctx.db).await.unwrap();

    // ctx registers its own admin, the seed adds 4 accounts of its own
    assert_eq!(User::count(&ctx.db).await.unwrap(), 5);
    assert_eq!(Formador::count(&ctx.db).await.unwrap(), 2);
    assert_eq!(Formando::count(&ctx.db).await.unwrap(), 1);
    assert_eq!(Area::count(&ctx.db).await.unwrap(), 2);
    assert_eq!(Curso::count(&ctx.db).await.unwrap(), 1);
    assert_eq!(Modulo::count(&ctx.db).await.unwrap(), 3);
    assert_eq!(Turma::count(&ctx.db).await.unwrap(), 1);
    assert_eq!(TurmaModulo::count(&ctx.db).await.unwrap(), 3);
    assert_eq!(Inscricao::count_ativas(&ctx.db).await.unwrap(), 1);

    // Second run inserts nothing
    seed::run(&ctx.db).await.unwrap();

    assert_eq!(User::count(&ctx.db).await.unwrap(), 5);
    assert_eq!(Area::count(&ctx.db).await.unwrap(), 2);
    assert_eq!(Curso::count(&ctx.db).await.unwrap(), 1);
    assert_eq!(Modulo::count(&ctx.db).await.unwrap(), 3);
    assert_eq!(TurmaModulo::count(&ctx.db).await.unwrap(), 3);
    assert_eq!(Inscricao::count_ativas(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_file_upload_and_download() {
    let ctx = TestContext::new().await.unwrap();
    let admin_id = ctx.admin.id;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/utilizadores/{admin_id}/ficheiros?nome=cv.pdf"))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/pdf")
        .body(Body::from(&b"%PDF-1.4 fake"[..]))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let meta: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(meta["nome_ficheiro"], "cv.pdf");
    assert_eq!(meta["content_type"], "application/pdf");
    let ficheiro_id = meta["id"].as_i64().unwrap();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/ficheiros/{ficheiro_id}"))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 fake");

    // Other non-admin users may not read it
    let (_, _, token) = register_formando(&ctx, "x@test.pt", "F001").await;
    let (status, _) = ctx
        .request("GET", &format!("/v1/ficheiros/{ficheiro_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/forgot-password",
            None,
            Some(json!({ "email": "admin@test.pt" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Delivery is out of band, so read the issued token from the store
    let user = User::find_by_email(&ctx.db, "admin@test.pt")
        .await
        .unwrap()
        .unwrap();
    let token = user.reset_token.expect("token issued");

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/reset-password",
            None,
            Some(json!({ "token": token, "new_password": "new-admin-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works, new one does
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "admin@test.pt", "password": "admin-password-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "admin@test.pt", "password": "new-admin-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_token_carries_profile_claims() {
    let ctx = TestContext::new().await.unwrap();
    let (user_id, formador_id, _) = register_formador(&ctx, "f@test.pt").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "f@test.pt", "password": "formador-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let claims = gestforma_shared::auth::jwt::validate_access_token(
        body["access_token"].as_str().unwrap(),
        common::JWT_SECRET,
    )
    .unwrap();

    assert_eq!(claims.sub, user_id);
    assert_eq!(
        serde_json::to_value(claims.role).unwrap(),
        json!("Formador")
    );
    assert_eq!(claims.formador_id, Some(formador_id));
    assert!(claims.is_formador);
    assert_eq!(claims.formando_id, None);
    assert!(!claims.is_formando);
}

#[tokio::test]
async fn test_strict_profile_create_conflicts_on_duplicate() {
    use gestforma_shared::models::formador::CreateFormador;
    use gestforma_shared::services::perfil_service;

    let ctx = TestContext::new().await.unwrap();
    let (user_id, _, _) = register_formador(&ctx, "f@test.pt").await;

    // Registration already created the profile; a direct second create must
    // answer Conflict, not a second row
    let result = perfil_service::create_formador(
        &ctx.db,
        CreateFormador {
            user_id,
            area_especializacao: "Outra Area".to_string(),
            cor_calendario: None,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(gestforma_shared::error::DomainError::Conflict(_))
    ));
    assert_eq!(Formador::count(&ctx.db).await.unwrap(), 1);

    // Same rule for trainee profiles
    use gestforma_shared::models::formando::CreateFormando;
    let (formando_user_id, _, _) = register_formando(&ctx, "x@test.pt", "F001").await;
    let result = perfil_service::create_formando(
        &ctx.db,
        CreateFormando {
            user_id: formando_user_id,
            numero_aluno: "F999".to_string(),
            data_nascimento: None,
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(gestforma_shared::error::DomainError::Conflict(_))
    ));
    assert_eq!(Formando::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_profile_upsert_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let admin_id = ctx.admin.id;

    let body = json!({ "user_id": admin_id, "area_especializacao": "Gestao" });
    let (status, first) = ctx.post("/v1/perfis/formadores", body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = ctx.post("/v1/perfis/formadores", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    assert_eq!(Formador::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_account_deactivate_and_delete_flow() {
    let ctx = TestContext::new().await.unwrap();
    let (user_id, formando_id, token) = register_formando(&ctx, "carla@test.pt", "F100").await;

    // Directory is admin-only
    let (status, users) = ctx.get("/v1/utilizadores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users.as_array().unwrap().iter().all(|u| u["password_hash"].is_null()));
    let (status, _) = ctx
        .request("GET", "/v1/utilizadores", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Deactivation locks the account out of login
    let (status, user) = ctx
        .request(
            "PUT",
            &format!("/v1/utilizadores/{}/ativo", user_id),
            Some(ctx.admin_token.as_str()),
            Some(json!({ "ativo": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["ativo"], false);

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": "carla@test.pt", "password": "formando-pass-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The account cannot go while the trainee profile references it
    let (status, _) = ctx.delete(&format!("/v1/utilizadores/{}", user_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx.delete(&format!("/v1/formandos/{}", formando_id)).await;
    assert_eq!(status, StatusCode::OK, "delete formando: {}", body);
    assert_eq!(body["deleted"], true);

    let (status, _) = ctx.delete(&format!("/v1/utilizadores/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(User::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_trainer_directory_and_assignments() {
    let ctx = TestContext::new().await.unwrap();
    let (area_id, curso_id, modulo_id) = seed_catalog(&ctx).await;
    let (_, formador_id, _) = register_formador(&ctx, "rita@test.pt").await;

    let (status, turma) = ctx
        .post(
            "/v1/turmas",
            json!({
                "curso_id": curso_id,
                "nome": "TI-2025-A",
                "data_inicio": "2025-09-15",
                "data_fim": "2026-06-26",
                "local": "Porto"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let turma_id = turma["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            &format!("/v1/turmas/{}/modulos", turma_id),
            json!({ "modulo_id": modulo_id, "formador_id": formador_id, "sequencia": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Directory and per-trainer assignment listing
    let (status, formadores) = ctx.get("/v1/formadores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(formadores.as_array().unwrap().len(), 1);

    let (status, atribuicoes) = ctx
        .get(&format!("/v1/formadores/{}/turma-modulos", formador_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(atribuicoes.as_array().unwrap().len(), 1);
    assert_eq!(atribuicoes[0]["turma_id"].as_i64(), Some(turma_id));

    // Filtered catalog listings
    let (status, turmas) = ctx
        .get(&format!("/v1/turmas?curso_id={}", curso_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turmas.as_array().unwrap().len(), 1);

    let (status, cursos) = ctx.get(&format!("/v1/cursos?area_id={}", area_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cursos.as_array().unwrap().len(), 1);

    let (status, _) = ctx.get("/v1/turmas?curso_id=9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The trainer profile cannot go while an assignment references it
    let (status, _) = ctx.delete(&format!("/v1/formadores/{}", formador_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_registration_leaves_no_orphan_account() {
    let ctx = TestContext::new().await.unwrap();
    register_formando(&ctx, "a@test.pt", "F001").await;

    // Duplicate student number: the whole registration rolls back
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "email": "b@test.pt",
                "password": "formando-pass-1",
                "nome": "Formando Teste",
                "role": "Formando",
                "numero_aluno": "F001"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(User::find_by_email(&ctx.db, "b@test.pt")
        .await
        .unwrap()
        .is_none());

    // The email stays free, so the corrected retry goes through
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "email": "b@test.pt",
                "password": "formando-pass-1",
                "nome": "Formando Teste",
                "role": "Formando",
                "numero_aluno": "F002"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "retry after rollback: {}", body);
}

#[tokio::test]
async fn test_self_registration_cannot_claim_management_roles() {
    let ctx = TestContext::new().await.unwrap();

    for role in ["SuperAdmin", "Admin", "Secretaria"] {
        let (status, _) = ctx
            .request(
                "POST",
                "/v1/auth/register",
                None,
                Some(json!({
                    "email": "mallory@test.pt",
                    "password": "mallory-pass-1",
                    "nome": "Mallory",
                    "role": role
                })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {} self-registered", role);
    }
    assert!(User::find_by_email(&ctx.db, "mallory@test.pt")
        .await
        .unwrap()
        .is_none());
    // The ctx admin remains the only account
    assert_eq!(User::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_availability_windows_flow() {
    let ctx = TestContext::new().await.unwrap();
    let (_, formador_a, token_a) = register_formador(&ctx, "a@test.pt").await;
    let (_, _, token_b) = register_formador(&ctx, "b@test.pt").await;

    // A trainer declares their own window
    let (status, window) = ctx
        .request(
            "POST",
            "/v1/disponibilidades",
            Some(&token_a),
            Some(json!({
                "alvo": { "tipo": "formador", "id": formador_a },
                "inicio": "2025-03-10T09:00:00Z",
                "fim": "2025-03-10T13:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "own window: {}", window);
    assert_eq!(window["disponivel"], true);
    let window_id = window["id"].as_i64().unwrap();

    // Another trainer cannot declare windows on A's behalf
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/disponibilidades",
            Some(&token_b),
            Some(json!({
                "alvo": { "tipo": "formador", "id": formador_a },
                "inicio": "2025-03-11T09:00:00Z",
                "fim": "2025-03-11T13:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Degenerate interval
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/disponibilidades",
            Some(&token_a),
            Some(json!({
                "alvo": { "tipo": "formador", "id": formador_a },
                "inicio": "2025-03-10T13:00:00Z",
                "fim": "2025-03-10T13:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown subject (management token, so the gate lets it reach the store)
    let (status, _) = ctx
        .post(
            "/v1/disponibilidades",
            json!({
                "alvo": { "tipo": "formador", "id": 9999 },
                "inicio": "2025-03-10T09:00:00Z",
                "fim": "2025-03-10T13:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Overlapping windows are stored as given, not merged
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/disponibilidades",
            Some(&token_a),
            Some(json!({
                "alvo": { "tipo": "formador", "id": formador_a },
                "inicio": "2025-03-10T11:00:00Z",
                "fim": "2025-03-10T15:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, windows) = ctx
        .get(&format!(
            "/v1/disponibilidades?formador_id={}&desde=2025-03-10T00:00:00Z&ate=2025-03-11T00:00:00Z",
            formador_a
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(windows.as_array().unwrap().len(), 2);

    // A range past the windows sees nothing
    let (status, windows) = ctx
        .get(&format!(
            "/v1/disponibilidades?formador_id={}&desde=2025-03-12T00:00:00Z&ate=2025-03-13T00:00:00Z",
            formador_a
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(windows.as_array().unwrap().is_empty());

    // Exactly one subject filter
    let (status, _) = ctx
        .get("/v1/disponibilidades?desde=2025-03-10T00:00:00Z&ate=2025-03-11T00:00:00Z")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The session calendar answers the same way for an unknown trainer
    let (status, _) = ctx
        .get("/v1/sessoes?formador_id=9999&desde=2025-03-10T00:00:00Z&ate=2025-03-11T00:00:00Z")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Room windows go through the management gate
    let (status, sala) = ctx
        .post(
            "/v1/salas",
            json!({ "nome": "Sala 2.04", "capacidade": 12, "tipo": "Teorica" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let sala_id = sala["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            "/v1/disponibilidades",
            json!({
                "alvo": { "tipo": "sala", "id": sala_id },
                "inicio": "2025-03-10T08:00:00Z",
                "fim": "2025-03-10T20:00:00Z",
                "disponivel": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, windows) = ctx
        .get(&format!(
            "/v1/disponibilidades?sala_id={}&desde=2025-03-10T00:00:00Z&ate=2025-03-11T00:00:00Z",
            sala_id
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(windows.as_array().unwrap().len(), 1);
    assert_eq!(windows[0]["disponivel"], false);

    // Only the owner (or management) removes a trainer window
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/disponibilidades/{}", window_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/v1/disponibilidades/{}", window_id),
            Some(&token_a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
}
