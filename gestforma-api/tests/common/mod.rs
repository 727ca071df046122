/// Common test utilities for integration tests
///
/// Every test gets its own in-memory SQLite database with one connection, so
/// tests are fully isolated and need no external services.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use gestforma_api::app::{build_router, AppState};
use gestforma_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use gestforma_shared::auth::jwt::create_token_pair;
use gestforma_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use gestforma_shared::models::user::{Role, User};
use gestforma_shared::services::auth_service::{self, RegisterInput};
use sqlx::SqlitePool;
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub admin: User,
    pub admin_token: String,
}

impl TestContext {
    /// Creates a fresh in-memory database, migrates it, and registers one
    /// admin account.
    pub async fn new() -> anyhow::Result<Self> {
        // The production pool builder, so foreign keys are enforced here the
        // same way they are at runtime. One connection: the in-memory
        // database lives exactly as long as the pool.
        let db = create_pool(PoolConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..PoolConfig::default()
        })
        .await?;

        sqlx::migrate!("../gestforma-shared/migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
            },
        };

        let (admin, tokens) = auth_service::register(
            &db,
            JWT_SECRET,
            RegisterInput {
                email: "admin@test.pt".to_string(),
                password: "admin-password-1".to_string(),
                nome: "Test Admin".to_string(),
                telefone: None,
                role: Role::Admin,
                area_especializacao: None,
                numero_aluno: None,
                data_nascimento: None,
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            admin,
            admin_token: tokens.access_token,
        })
    }

    /// Returns authorization header value for the admin account
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Issues an access token for an arbitrary identity, bypassing login.
    pub fn token_for(
        &self,
        user_id: i64,
        role: Role,
        formador_id: Option<i64>,
        formando_id: Option<i64>,
    ) -> String {
        create_token_pair(user_id, role, formador_id, formando_id, JWT_SECRET)
            .expect("token creation")
            .access_token
    }

    /// Sends a JSON request and returns status plus the parsed body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.app.clone().call(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    /// GET with the admin token
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request("GET", uri, Some(self.admin_token.as_str()), None)
            .await
    }

    /// POST with the admin token
    pub async fn post(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("POST", uri, Some(self.admin_token.as_str()), Some(body))
            .await
    }

    /// DELETE with the admin token
    pub async fn delete(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request("DELETE", uri, Some(self.admin_token.as_str()), None)
            .await
    }
}

/// Builds a minimal catalog: one area, one course, one module. Returns
/// (area_id, curso_id, modulo_id).
pub async fn seed_catalog(ctx: &TestContext) -> (i64, i64, i64) {
    let (status, area) = ctx
        .post("/v1/areas", serde_json::json!({ "nome": "Informatica" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, curso) = ctx
        .post(
            "/v1/cursos",
            serde_json::json!({
                "area_id": area["id"],
                "nome": "Tecnico de Informatica",
                "nivel": "Nivel 4"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, modulo) = ctx
        .post(
            "/v1/modulos",
            serde_json::json!({ "nome": "Algoritmia", "carga_horaria": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    (
        area["id"].as_i64().expect("area id"),
        curso["id"].as_i64().expect("curso id"),
        modulo["id"].as_i64().expect("modulo id"),
    )
}

/// Registers a trainer account; returns (user_id, formador_id, access_token).
pub async fn register_formador(ctx: &TestContext, email: &str) -> (i64, i64, String) {
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": "formador-pass-1",
                "nome": "Formador Teste",
                "role": "Formador",
                "area_especializacao": "Programacao"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "register formador: {}", body);

    let user_id = body["user_id"].as_i64().expect("user_id");
    let formador = gestforma_shared::models::formador::Formador::find_by_user_id(&ctx.db, user_id)
        .await
        .expect("query")
        .expect("profile");

    let token = body["access_token"].as_str().expect("token").to_string();
    (user_id, formador.id, token)
}

/// Registers a trainee account; returns (user_id, formando_id, access_token).
pub async fn register_formando(ctx: &TestContext, email: &str, numero: &str) -> (i64, i64, String) {
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": "formando-pass-1",
                "nome": "Formando Teste",
                "role": "Formando",
                "numero_aluno": numero
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "register formando: {}", body);

    let user_id = body["user_id"].as_i64().expect("user_id");
    let formando = gestforma_shared::models::formando::Formando::find_by_user_id(&ctx.db, user_id)
        .await
        .expect("query")
        .expect("profile");

    let token = body["access_token"].as_str().expect("token").to_string();
    (user_id, formando.id, token)
}
