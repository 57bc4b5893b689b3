use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use garagebook::config::AppConfig;
use garagebook::db;
use garagebook::handlers;
use garagebook::services::cache::MemoryCache;
use garagebook::services::lookup::dves::DvesLookupProvider;
use garagebook::services::pricing::PriceTable;
use garagebook::services::ranking::WeightedScorer;
use garagebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    // A bad price table is a deploy defect; refuse to start rather than
    // quote from it.
    let prices = match &config.price_table_json {
        Some(json) => PriceTable::from_json(json)?,
        None => {
            let table = PriceTable::default();
            table.validate()?;
            table
        }
    };
    tracing::info!(mot_price = prices.mot_price, "price table loaded");

    if config.dves_api_key.is_empty() {
        tracing::warn!("DVES_API_KEY not set, vehicle lookups will fail");
    }
    let lookup = DvesLookupProvider::new(config.dves_api_url.clone(), config.dves_api_key.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        prices,
        lookup: Box::new(lookup),
        cache: Box::new(MemoryCache::new()),
        scorer: Box::new(WeightedScorer::default()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/vehicles/lookup",
            post(handlers::vehicles::lookup_vehicle),
        )
        .route("/api/quotes", get(handlers::quotes::get_quote))
        .route("/api/quotes/combo", get(handlers::quotes::get_combo_quote))
        .route("/api/slots", get(handlers::slots::get_slots))
        .route(
            "/api/slots/suggestions",
            get(handlers::slots::get_suggestions),
        )
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/:reference",
            get(handlers::bookings::get_booking),
        )
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(handlers::admin::cancel_booking),
        )
        .route("/api/admin/settings", get(handlers::admin::get_settings))
        .route(
            "/api/admin/settings",
            post(handlers::admin::update_settings),
        )
        .route("/api/admin/prices", get(handlers::admin::get_prices))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
