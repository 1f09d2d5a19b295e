use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mediquery::config::Settings;
use mediquery::error::handle_query_payload_error;
use mediquery::routes::{self, AppState};
use mediquery::services::{FeatureResolver, GeocoderClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting MediQuery service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let geocoder = GeocoderClient::new(
        settings.geocoder.endpoint.clone(),
        settings.geocoder.timeout(),
        &settings.geocoder.user_agent,
    )
    .map_err(|e| {
        error!("Failed to create geocoder client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!(
        "Geocoder initialized ({}, timeout: {:?})",
        geocoder.endpoint(),
        geocoder.timeout()
    );

    let resolver = FeatureResolver::new(
        settings.overpass.endpoints.clone(),
        settings.overpass.tag_filters.clone(),
        settings.overpass.radius_meters,
        settings.overpass.timeout(),
        settings.overpass.query_timeout_secs,
        &settings.overpass.user_agent,
    )
    .map_err(|e| {
        error!("Failed to create Overpass client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!(
        "Feature resolver initialized with {} endpoints (radius: {}m)",
        resolver.endpoints().len(),
        resolver.default_radius_meters()
    );

    let app_state = AppState {
        geocoder: Arc::new(geocoder),
        resolver: Arc::new(resolver),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Server running on http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
