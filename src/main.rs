//! wxalert - 7-day forecast with weather alerts
//!
//! Fetches a daily forecast from Open-Meteo for a city or coordinate pair,
//! caches the response on disk, and prints today's alerts with a short
//! outlook for the following days.

use std::process;

use clap::Parser;
use tracing::warn;

use wxalert::app::App;
use wxalert::cache::{ExpiringCache, FileStore, MemoryStore};
use wxalert::cli::{Cli, RunConfig};
use wxalert::logging;

/// Picks the on-disk store for this run, if caching is enabled and possible
fn file_store(config: &RunConfig) -> Option<FileStore> {
    if !config.cache.enabled {
        return None;
    }
    match &config.cache.dir {
        Some(dir) => Some(FileStore::with_dir(dir.clone())),
        None => {
            let store = FileStore::new();
            if store.is_none() {
                warn!("no cache directory available, running without a cache");
            }
            store
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    logging::init(&config.log_level);

    let app = App::new();
    let result = match file_store(&config) {
        Some(store) => app.run(&config, &ExpiringCache::new(store)).await,
        None => app.run(&config, &ExpiringCache::new(MemoryStore::new())).await,
    };

    match result {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
