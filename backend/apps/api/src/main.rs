//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors go through `auth::AuthError` / `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use auth::domain::repository::{SessionStore, UserRepository};
use auth::middleware::{install_panic_hook, with_outer_stages};
use auth::{
    AuthAppState, AuthConfig, InMemorySessionStore, InMemoryUserRepository, PgUserRepository,
    RedisSessionStore, auth_router,
};
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:31113";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    install_panic_hook();

    // Auth configuration
    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) if cfg!(debug_assertions) => {
            tracing::warn!(error = %e, "Falling back to development auth config");
            AuthConfig::development()?
        }
        Err(e) => bail!("loading auth configuration: {e}"),
    };

    let redis_url = env::var("REDIS_URL").ok();
    let database_url = env::var("DATABASE_URL").ok();

    match (redis_url, database_url) {
        (Some(redis_url), Some(database_url)) => {
            let store = connect_redis(&redis_url).await?;
            let users = connect_postgres(&database_url).await?;
            serve(store, users, config).await
        }
        (Some(redis_url), None) => {
            let store = connect_redis(&redis_url).await?;
            serve(store, in_memory_users()?, config).await
        }
        (None, Some(database_url)) => {
            let users = connect_postgres(&database_url).await?;
            serve(in_memory_sessions()?, users, config).await
        }
        (None, None) => serve(in_memory_sessions()?, in_memory_users()?, config).await,
    }
}

async fn connect_redis(url: &str) -> anyhow::Result<RedisSessionStore> {
    let store = RedisSessionStore::connect(url)
        .await
        .context("connecting to Redis")?;
    tracing::info!("Connected to Redis session store");
    Ok(store)
}

async fn connect_postgres(url: &str) -> anyhow::Result<PgUserRepository> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    Ok(PgUserRepository::new(pool))
}

fn in_memory_sessions() -> anyhow::Result<InMemorySessionStore> {
    if !cfg!(debug_assertions) {
        bail!("REDIS_URL must be set in production");
    }
    tracing::warn!("REDIS_URL not set, sessions are kept in memory");
    Ok(InMemorySessionStore::new())
}

fn in_memory_users() -> anyhow::Result<InMemoryUserRepository> {
    if !cfg!(debug_assertions) {
        bail!("DATABASE_URL must be set in production");
    }
    tracing::warn!("DATABASE_URL not set, users are kept in memory");
    Ok(InMemoryUserRepository::new())
}

async fn serve<S, U>(store: S, users: U, config: AuthConfig) -> anyhow::Result<()>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let csrf_header = HeaderName::from_bytes(config.csrf_header_name.as_bytes())
        .context("invalid CSRF header name")?;
    let state = AuthAppState::new(Arc::new(store), Arc::new(users), config);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

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
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            csrf_header.clone(),
        ]))
        .expose_headers(ExposeHeaders::list([
            csrf_header,
            HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true);

    // Build router
    let app = with_outer_stages(Router::new().nest("/api/auth", auth_router(state))).layer(cors);

    // Start server
    let addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .context("invalid LISTEN_ADDR")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
