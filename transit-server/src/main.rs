use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::cache::{CacheConfig, CachedGeocoder, IndexCache};
use transit_server::geo::GeoIndex;
use transit_server::geocode::{GeocodeClient, GeocoderConfig};
use transit_server::planner::SearchConfig;
use transit_server::web::{create_router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let feed_dir = std::env::args().nth(1).unwrap_or_else(|| "gtfs".to_string());
    let store = match transit_server::feed::load(&feed_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(dir = %feed_dir, error = %e, "Feed load failed");
            std::process::exit(1);
        }
    };

    let geo = GeoIndex::build(&store);
    let cache_config = CacheConfig::default();
    let indices = IndexCache::new(store, &cache_config);

    let geocoder = match GeocodeClient::new(GeocoderConfig::from_env()) {
        Ok(client) => CachedGeocoder::new(client, &cache_config),
        Err(e) => {
            error!(error = %e, "Geocoder setup failed");
            std::process::exit(1);
        }
    };

    let state = AppState::new(indices, geo, geocoder, SearchConfig::default());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
