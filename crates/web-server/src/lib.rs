use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::settings::Config;
use configuration::ReportSettings;
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub reports: ReportSettings,
}

/// Builds the full router: every endpoint plus CORS, request tracing and the body limit.
pub fn app(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/colleges",
            get(handlers::list_colleges).post(handlers::create_college),
        )
        .route(
            "/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/register", post(handlers::register_student))
        .route("/attendance", post(handlers::mark_attendance))
        .route("/feedback", post(handlers::submit_feedback))
        .route("/reports/event-popularity", get(handlers::event_popularity))
        .route(
            "/reports/student-participation/:student_id",
            get(handlers::student_participation),
        )
        .route("/reports/top-active", get(handlers::top_active))
        .route("/reports/event-stats/:event_id", get(handlers::event_stats))
        .route("/seed", post(handlers::seed))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request and its latency.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Connects to the database, applies migrations if configured, and serves until Ctrl-C.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&db_pool).await?;
    }

    let app_state = Arc::new(AppState {
        db_repo: DbRepository::new(db_pool),
        reports: config.reports.clone(),
    });
    let app = app(app_state, config.server.body_limit_bytes);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
