#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crash map application.
//!
//! Loads the crash data and ward boundaries once at startup, then serves
//! the derived views (marker layer, ward layer, charts) for whatever
//! filter state the client sends, along with the static frontend bundle.
//! The server keeps no per-client state: every request carries the full
//! filter state as query parameters.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use crash_map_dashboard::{LoadedData, Settings};
use crash_map_source::CrashMapConfig;
use crash_map_source::progress::null_progress;

/// Shared application state.
pub struct AppState {
    /// Crash records and ward boundaries, read-only after startup.
    pub data: Arc<LoadedData>,
    /// Map and chart settings.
    pub settings: Settings,
}

impl AppState {
    /// Wraps loaded data with settings taken from `config`.
    #[must_use]
    pub fn new(data: Arc<LoadedData>, config: &CrashMapConfig) -> Self {
        Self {
            data,
            settings: Settings::from(config),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filters))
            .route("/view", web::get().to(handlers::view))
            .route("/views", web::get().to(handlers::views))
            .route("/crashes", web::get().to(handlers::crashes))
            .route("/clusters", web::get().to(handlers::clusters))
            .route("/boundaries", web::get().to(handlers::boundaries))
            .route("/boundaries/select", web::get().to(handlers::select_at))
            .route("/wards/{ward}/select", web::get().to(handlers::select_ward))
            .route("/charts/severity", web::get().to(handlers::severity_chart))
            .route("/charts/severity.svg", web::get().to(handlers::severity_svg))
            .route("/charts/years", web::get().to(handlers::years_chart))
            .route("/charts/years.svg", web::get().to(handlers::years_svg)),
    );
}

/// Starts the crash map API server.
///
/// Loads both data inputs concurrently (a failed input leaves its layer
/// empty), then starts the Actix-Web HTTP server on the configured
/// address. The caller is responsible for initialising logging and for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: CrashMapConfig) -> std::io::Result<()> {
    log::info!("Loading crash data and ward boundaries...");
    let client = reqwest::Client::new();
    let data = crash_map_dashboard::load(&config.data, &client, &null_progress()).await;

    log::info!(
        "Loaded {} crash records ({} excluded) and {} ward boundaries",
        data.working_set.len(),
        data.working_set.excluded_count(),
        data.boundaries.len()
    );

    let state = web::Data::new(AppState::new(Arc::new(data), &config));

    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
