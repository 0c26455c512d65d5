//! Places Cache - command-line place lookup
//!
//! Usage:
//!   places_cache <place-id>...
//!   places_cache search <query words>...

use std::env;

use anyhow::bail;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use places_cache::places::{GooglePlacesOrigin, PlacesApiConfig, PlacesLookup};
use places_cache::{Backend, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured cache backend
/// 4. Resolve each argument through the cache-fronted origin
/// 5. Log cache statistics and stop background work
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "places_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: places_cache <place-id>... | places_cache search <query>");
    }

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: backend={}, table={}, ttl={}s, op_timeout={}ms, cleanup_interval={}s",
        config.backend, config.table, config.default_ttl, config.op_timeout_ms, config.cleanup_interval
    );

    let backend: Backend<Value> = Backend::from_config(&config).await?;
    info!("Cache backend initialized");

    let origin = GooglePlacesOrigin::new(
        PlacesApiConfig::new(config.places_api_key.clone())
            .with_base_url(config.places_base_url.clone()),
    );
    let lookup = PlacesLookup::new(backend.cache(), origin, config.default_ttl);

    if args[0] == "search" {
        let query = args[1..].join(" ");
        match lookup.text_search(&query).await {
            Ok(results) => println!("{}", serde_json::to_string_pretty(&results)?),
            Err(e) => error!("search failed for {:?}: {}", query, e),
        }
    } else {
        for place_id in &args {
            match lookup.place_details(place_id).await {
                Ok(place) => println!("{}", serde_json::to_string_pretty(&place)?),
                Err(e) => error!("lookup failed for {}: {}", place_id, e),
            }
        }
    }

    let stats = backend.cache().stats();
    info!(
        "Cache stats: hits={}, misses={}, expired={}, writes={}, errors={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.expired,
        stats.writes,
        stats.errors,
        stats.hit_rate()
    );

    backend.shutdown();
    Ok(())
}
