//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, http,
    http::{Method, header},
};
use ledger::{Ledger, LedgerConfig, ledger_router, run_periodic_sealer};
use modules::infra::ocr::StubOcrEngine;
use modules::{ModuleDeps, modules_router};
use platform::cache::MemoryCache;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::{PgUsersRepository, UsersConfig, users_router};
use uuid::Uuid;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,users=info,ledger=info,modules=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Ledger configuration; the node identifier doubles as the default miner
    let ledger_config = if cfg!(debug_assertions) {
        LedgerConfig::development()
    } else {
        LedgerConfig::default()
    };
    let node_id = Uuid::new_v4().simple().to_string();
    let ledger = Arc::new(Ledger::new(node_id));

    tracing::info!(node_id = %ledger.node_id(), "Ledger initialized");

    // Periodic sealer runs for the life of the process
    tokio::spawn(run_periodic_sealer(ledger.clone(), ledger_config.clone()));

    // Users configuration
    let users_config = UsersConfig {
        pepper: env::var("PASSWORD_PEPPER").ok(),
        ..UsersConfig::default()
    };

    // One cache shared by wallet nonces, halal verdicts, and text analysis
    let cache = MemoryCache::new();
    let module_deps = ModuleDeps {
        cache: cache.clone(),
        ocr: Arc::new(StubOcrEngine),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let api = Router::new()
        .nest(
            "/users",
            users_router(
                PgUsersRepository::new(pool.clone()),
                cache.clone(),
                users_config.clone(),
            ),
        )
        .nest("/ledger", ledger_router(ledger.clone(), ledger_config.clone()))
        .merge(modules_router(
            pool.clone(),
            ledger,
            ledger_config,
            PgUsersRepository::new(pool),
            users_config,
            module_deps,
        ));

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
