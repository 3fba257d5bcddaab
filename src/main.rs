//! Salon Booking Server
//!
//! REST API server for salon appointment scheduling.

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
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use salon_booking_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Salon Booking Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Create repository and services
    let repository = Repository::new(pool, &config.scheduling);
    let services = Services::new(repository, &config.scheduling);

    tracing::info!(
        granularity = config.scheduling.slot_granularity_minutes,
        retries = config.scheduling.booking_retry_attempts,
        "Scheduling configured"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Stdout logging in pretty or JSON form, plus daily-rotated JSON files when
/// a directory is configured
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("salon_booking_server={},tower_http=debug", config.level).into()
    });

    let stdout_layer = match config.format.as_str() {
        "json" => fmt::layer().json().boxed(),
        _ => fmt::layer().boxed(),
    };

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "salon-booking-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Salons
        .route("/salons", get(api::salons::list_salons).post(api::salons::create_salon))
        .route("/salons/:id", get(api::salons::get_salon).put(api::salons::update_salon))
        .route("/salons/:id/staff", get(api::salons::list_staff).post(api::salons::create_staff))
        .route("/salons/:id/services", get(api::catalog::list_services).post(api::catalog::create_service))
        .route("/salons/:id/schedule", get(api::schedules::get_salon_schedule))
        .route("/salons/:id/schedule/:day", put(api::schedules::put_salon_schedule_day))
        .route("/salons/:id/closures", get(api::schedules::list_salon_closures))
        .route("/salons/:id/closures", post(api::schedules::create_salon_closure))
        .route("/salons/:id/availability", get(api::availability::get_availability))
        .route("/salons/:id/stats", get(api::stats::get_booking_stats))
        // Staff
        .route("/staff/:id", get(api::salons::get_staff).put(api::salons::update_staff))
        .route("/staff/:id/schedule", get(api::schedules::get_staff_schedule))
        .route("/staff/:id/schedule/:day", put(api::schedules::put_staff_schedule_day))
        .route("/staff/:id/closures", get(api::schedules::list_staff_closures))
        .route("/staff/:id/closures", post(api::schedules::create_staff_closure))
        .route("/staff/:id/working-hours", get(api::availability::get_working_hours))
        // Services
        .route("/services/:id", get(api::catalog::get_service).put(api::catalog::update_service))
        // Closures
        .route("/closures/:id", delete(api::schedules::delete_closure))
        // Bookings
        .route("/bookings", get(api::bookings::list_bookings).post(api::bookings::create_booking))
        .route("/bookings/:id", get(api::bookings::get_booking))
        .route("/bookings/:id/status", put(api::bookings::update_booking_status))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
