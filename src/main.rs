use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ngopi::config::{Config, SecurityConfig};
use ngopi::middleware::{AdminAuth, RateLimiter, RequestId};
use ngopi::modules::{health, Repositories};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(config.app.json_logs);

    tracing::info!("Starting Ngopi admin API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.max_connections
    );

    if config.app.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let auth = AdminAuth::new(&config.security.admin_token_hash)?;
    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute)?;
    let repositories = Repositories::mysql(db_pool.clone());
    let security = config.security.clone();

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let repositories = repositories.clone();
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(payload_config())
            .configure(health::configure)
            .configure(move |cfg| repositories.configure(cfg))
            .wrap(auth.clone())
            .wrap(rate_limiter.clone())
            .wrap(cors(&security))
            .wrap(RequestId)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ngopi=debug,actix_web=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn cors(security: &SecurityConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(["x-request-id"])
        .max_age(3600);

    if security.cors_allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }

    security
        .cors_allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

// Bodies are read as raw bytes and parsed by the payload readers
fn payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(256 * 1024)
}
