/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use gestforma_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::SqlitePool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = SqlitePool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use gestforma_shared::auth::middleware::jwt_auth_middleware;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1
///     ├── /auth/*                   # register, login, refresh, reset (public)
///     ├── /turmas, /turma-modulos   # Class management
///     ├── /inscricoes, /formandos   # Enrollments
///     ├── /avaliacoes               # Grades
///     ├── /sessoes                  # Scheduled sessions
///     ├── /disponibilidades         # Availability windows
///     ├── /salas                    # Rooms
///     ├── /areas, /cursos, /modulos # Catalog
///     └── /utilizadores, /perfis,   # Accounts, profiles, files
///         /formadores, /formandos,
///         /ficheiros
/// ```
///
/// Everything under `/v1` except `/v1/auth` requires a valid JWT Bearer
/// token; role checks happen in the handlers.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: no token required
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/reset-password", post(routes::auth::reset_password));

    let protected_routes = Router::new()
        // Turmas and module distributions
        .route(
            "/turmas",
            get(routes::turmas::list_turmas).post(routes::turmas::create_turma),
        )
        .route(
            "/turmas/:id",
            get(routes::turmas::get_turma).delete(routes::turmas::delete_turma),
        )
        .route(
            "/turmas/:id/modulos",
            get(routes::turmas::list_turma_modulos).post(routes::turmas::add_turma_modulo),
        )
        .route(
            "/turma-modulos/:id",
            delete(routes::turmas::remove_turma_modulo),
        )
        // Enrollments
        .route(
            "/turmas/:id/inscricoes",
            get(routes::inscricoes::list_by_turma).post(routes::inscricoes::enroll),
        )
        .route("/inscricoes/:id/desistir", post(routes::inscricoes::desistir))
        .route("/inscricoes/:id/concluir", post(routes::inscricoes::concluir))
        .route("/inscricoes/:id", delete(routes::inscricoes::delete_inscricao))
        .route(
            "/formandos/:id/inscricoes",
            get(routes::inscricoes::list_by_formando),
        )
        // Grades
        .route(
            "/turmas/:id/avaliacoes",
            get(routes::avaliacoes::list_by_turma).post(routes::avaliacoes::record_grade),
        )
        .route(
            "/avaliacoes/:id",
            put(routes::avaliacoes::update_grade).delete(routes::avaliacoes::delete_grade),
        )
        .route(
            "/formandos/:id/avaliacoes",
            get(routes::avaliacoes::list_by_formando),
        )
        // Sessions
        .route(
            "/sessoes",
            get(routes::sessoes::list_sessoes).post(routes::sessoes::create_sessao),
        )
        .route("/sessoes/:id", delete(routes::sessoes::delete_sessao))
        // Availability
        .route(
            "/disponibilidades",
            get(routes::disponibilidades::list_disponibilidades)
                .post(routes::disponibilidades::create_disponibilidade),
        )
        .route(
            "/disponibilidades/:id",
            delete(routes::disponibilidades::delete_disponibilidade),
        )
        // Rooms
        .route(
            "/salas",
            get(routes::salas::list_salas).post(routes::salas::create_sala),
        )
        .route(
            "/salas/:id",
            get(routes::salas::get_sala).delete(routes::salas::delete_sala),
        )
        // Catalog
        .route(
            "/areas",
            get(routes::cursos::list_areas).post(routes::cursos::create_area),
        )
        .route("/areas/:id", delete(routes::cursos::delete_area))
        .route(
            "/cursos",
            get(routes::cursos::list_cursos).post(routes::cursos::create_curso),
        )
        .route(
            "/cursos/:id",
            get(routes::cursos::get_curso).delete(routes::cursos::delete_curso),
        )
        .route(
            "/cursos/:id/modulos",
            get(routes::cursos::list_curso_modulos).post(routes::cursos::add_curso_modulo),
        )
        .route(
            "/curso-modulos/:id/confirmar",
            post(routes::cursos::confirmar_curso_modulo),
        )
        .route(
            "/curso-modulos/:id",
            delete(routes::cursos::remove_curso_modulo),
        )
        .route(
            "/modulos",
            get(routes::cursos::list_modulos).post(routes::cursos::create_modulo),
        )
        .route("/modulos/:id", delete(routes::cursos::delete_modulo))
        // Accounts, profiles, and files
        .route("/utilizadores", get(routes::perfis::list_utilizadores))
        .route(
            "/utilizadores/:id",
            delete(routes::perfis::delete_utilizador),
        )
        .route(
            "/utilizadores/:id/ativo",
            put(routes::perfis::set_utilizador_ativo),
        )
        .route(
            "/formadores",
            get(routes::perfis::list_formadores),
        )
        .route("/formadores/:id", delete(routes::perfis::delete_formador))
        .route(
            "/formadores/:id/turma-modulos",
            get(routes::turmas::list_formador_modulos),
        )
        .route(
            "/formandos",
            get(routes::perfis::list_formandos),
        )
        .route("/formandos/:id", delete(routes::perfis::delete_formando))
        .route("/perfis/formadores", post(routes::perfis::create_formador))
        .route("/perfis/formandos", post(routes::perfis::create_formando))
        .route(
            "/utilizadores/:id/ficheiros",
            get(routes::perfis::list_ficheiros).post(routes::perfis::upload_ficheiro),
        )
        .route(
            "/ficheiros/:id",
            get(routes::perfis::download_ficheiro).delete(routes::perfis::delete_ficheiro),
        )
        .layer(middleware::from_fn({
            let secret = state.config.jwt.secret.clone();
            move |req, next| jwt_auth_middleware(secret.clone(), req, next)
        }));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
