use actix_multipart::form::MultipartFormConfig;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use dh_portfolio_backend::{
    db::{mysql::Database, schema::SchemaManager},
    graceful_shutdown::shutdown_signal,
    middlewares::{auth::AuthMiddleware, cors::build_cors},
    routes::configure_routes,
    settings::AppConfig,
    storage::file_store::LocalFileStore,
    utils::telemetry::init_tracing,
    AppState,
};

/// Multipart bodies carry up to ten files plus form overhead.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(config.log_format)?;
    tracing::info!("Loaded configuration: {:?}", config);

    let database = Database::connect(&config)
        .await
        .context("Failed to connect to the database")?;

    SchemaManager::new(&database)
        .initialize()
        .await
        .context("Failed to initialize the database schema")?;

    let file_store = LocalFileStore::new(&config.upload_dir)
        .await
        .context("Failed to prepare the upload directory")?;

    let app_state = web::Data::new(AppState::new(&config, &database, file_store));

    let server_addr = format!("{}:{}", config.host, config.port);
    let cors_origins = config.cors_origins();
    let max_upload_bytes = config.max_upload_bytes;

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes * 10 + MULTIPART_OVERHEAD_BYTES)
                    .memory_limit(MULTIPART_OVERHEAD_BYTES)
            )
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .shutdown_timeout(30)
    .disable_signals()
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => {
            tracing::info!("Stopping HTTP server");
            handle.stop(true).await;
        }
    }

    database.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
