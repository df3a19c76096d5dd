use attendance_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{cors::scanning_cors, rate_limit},
    routes, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool)?;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/openapi.json", get(routes::docs::openapi_json));

    let scan_api = Router::new()
        .route("/api/scan", post(routes::scan::record_scan))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.scan_rps),
            rate_limit::rps_middleware,
        ));

    let report_api = Router::new()
        .route("/api/sessions", get(routes::catalog::list_sessions))
        .route("/api/completion", get(routes::completion::get_completion))
        .route("/api/completion/report", get(routes::completion::get_report))
        .route(
            "/api/completion/report/export",
            get(routes::export::export_report),
        )
        .route(
            "/api/attendance/sessions/:session_id",
            get(routes::attendance::session_attendance),
        )
        .route(
            "/api/attendance/participants/:participant_id",
            get(routes::attendance::participant_attendance),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.report_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(scan_api)
        .merge(report_api)
        .with_state(app_state)
        .layer(scanning_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
