use axum::{http::Method, routing::get, Json, Router};
use configuration::Settings;
use database::{DbRepository, StatsStore};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod error;
pub mod handlers;
pub mod openapi;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub stats: Box<dyn StatsStore>,
}

impl AppState {
    pub fn new(stats: impl StatsStore + 'static) -> Self {
        Self {
            stats: Box::new(stats),
        }
    }
}

/// # GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Builds the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/stats/global", get(handlers::get_global_stats))
        .route("/stats/comparison", get(handlers::get_semester_comparison))
        .route("/stats/courses/:course_id", get(handlers::get_course_stats))
        .route(
            "/stats/courses/:course_id/distribution",
            get(handlers::get_course_distribution),
        )
        .route(
            "/stats/students/:student_id/semesters",
            get(handlers::get_student_semester_stats),
        )
        .route(
            "/stats/students/:student_id/progress",
            get(handlers::get_student_progress),
        )
        .route("/stats/teachers/:teacher_id", get(handlers::get_teacher_stats))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request and its response.
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

/// Connects to the database and serves the statistics API until Ctrl-C.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;

    let db_pool = database::connect(&settings.database).await?;
    let db_repo = DbRepository::new(db_pool, settings.database.query_timeout());
    let app_state = Arc::new(AppState::new(db_repo));

    let app = build_router(app_state, settings.server.request_timeout());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
