use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flat_listing::config::Config;
use flat_listing::feed::{build_client, HttpListingSource};
use flat_listing::storage::FileStorage;
use flat_listing::FlatsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env()?;

    let source = HttpListingSource::new(build_client()?, &cfg.flats_base_url, &cfg.rooms_url);
    let mut store = FlatsStore::new(Arc::new(source));

    if let Some(dir) = &cfg.filter_cache_dir {
        let storage = FileStorage::new(dir)?;
        info!(dir = %storage.dir().display(), "Persisting filters");
        store = store.with_storage(Arc::new(storage), cfg.save_debounce);
    }

    tokio::join!(store.fetch_available_rooms_data(), store.fetch_more_flats());

    let mut attempts = 1;
    while store.can_fetch_more() && attempts < cfg.max_pages {
        // polite delay
        sleep(Duration::from_millis(cfg.delay_ms)).await;
        store.fetch_more_flats().await;
        attempts += 1;
    }

    let state = store.snapshot();
    let bounds = state.bounds();
    let flats = store.sorted_flats_list();

    println!("\n==============================");
    println!("FLATS LOADED:   {}", state.flats_list.len());
    println!("ROOM OPTIONS:   {:?}", state.rooms_list);
    println!("PRICE RANGE:    {} - {}", bounds.min_price, bounds.max_price);
    println!("AREA RANGE:     {} - {}", bounds.min_area, bounds.max_area);
    if state.filters_active() {
        println!("SELECTED ROOMS: {:?}", state.selection.selected_rooms);
        println!("PRICE FILTER:   {:?}", state.selection.price_filter_value);
        println!("AREA FILTER:    {:?}", state.selection.area_filter_value);
    }
    println!("MATCHING FLATS: {}", flats.len());
    println!("==============================\n");

    for flat in &flats {
        println!("{} rooms | {} m2 | {}", flat.rooms, flat.area, flat.price);
    }

    Ok(())
}
