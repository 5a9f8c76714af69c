use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use parish_api::auth::{self, AppState, AppStateInner};
use parish_api::{events, join, prayers, reflections};
use parish_auth::token::TokenKeys;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parish=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("PARISH_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("PARISH_DB_PATH").unwrap_or_else(|_| "parish.db".into());
    let host = std::env::var("PARISH_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PARISH_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = parish_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens: TokenKeys::new(jwt_secret.as_bytes()),
    });

    // Routes. /prayers is public for reads and submissions; the moderation
    // verbs and ?pending=true guard themselves against admin claims.
    let app = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/prayers",
            get(prayers::list_prayers)
                .post(prayers::submit_prayer)
                .put(prayers::moderate_prayer),
        )
        .route("/prayers/support", post(prayers::support_prayer))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/register", post(events::register_event))
        .route(
            "/reflections",
            get(reflections::list_reflections).post(reflections::create_reflection),
        )
        .route(
            "/join",
            get(join::list_join_requests).post(join::create_join_request),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Parish server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
