//! Backline Server - Audio Equipment Inventory & Maintenance
//!
//! REST JSON API for tracking audio gear, its maintenance lifecycle and the
//! notifications that go with it.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backline_server::{
    api,
    config::{AppConfig, StorageBackend},
    services::Services,
    store::{self, Store},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("backline_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Backline Server v{}", env!("CARGO_PKG_VERSION"));

    // Select the storage backend
    let store = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database migrations completed");

            Store::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            Store::memory()
        }
    };

    if config.storage.seed_demo_data {
        store::seed::seed_demo_data(&store)
            .await
            .expect("Failed to seed demo data");
    }

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create services and application state
    let services = Services::new(store, config.auth.clone());
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check & client configuration
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .route("/client-config", get(api::health::client_config))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Equipment lifecycle
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", put(api::equipment::update_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        .route("/equipment/:id/status", put(api::equipment::set_status))
        .route("/equipment/:id/logs", post(api::equipment::report_issue))
        .route("/equipment/:id/resolve", post(api::equipment::resolve_maintenance))
        // Notifications
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/:id/read", post(api::notifications::mark_read))
        .route("/notifications/read-all", post(api::notifications::mark_all_read))
        // User management
        .route("/admin/users", get(api::users::list_users))
        .route("/admin/users", post(api::users::create_user))
        .route("/admin/users/:id", delete(api::users::delete_user))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
