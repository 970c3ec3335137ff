//! Application wiring: overlays, Steam library, providers, pipeline.

use steamgrid_artwork::{
    HttpConfig, HttpImageProvider, SearchBackend, SteamCdn, SteamGridDb, WebImageSearch,
    build_http_client,
};
use steamgrid_grid::{GridError, Pipeline, PipelineEvent, load_overlays};
use steamgrid_steam::Paths;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::library::SteamLibrary;
use crate::report;

const OVERLAYS_WIKI: &str = "https://www.reddit.com/r/steamgrid/wiki/overlays";

/// Runs every profile to completion and prints the summary.
pub async fn run(config: Config) -> anyhow::Result<()> {
    println!("Loading overlays...");
    let overlays_dir = config.overlays_dir();
    let overlays = load_overlays(&overlays_dir)?;
    for skipped in overlays.skipped() {
        println!(
            "Skipped overlay {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }
    if overlays.is_empty() {
        println!(
            "No category overlays found. You can put overlay images in the folder '{}', \
             where the filename is the game category.\n\n\
             You can find many user-created overlays at {OVERLAYS_WIKI} .\n\n\
             Continuing without overlays...\n",
            overlays_dir.display()
        );
    } else {
        println!(
            "Loaded {} overlays. \n\nYou can find many user-created overlays at {OVERLAYS_WIKI} .\n",
            overlays.len()
        );
    }

    println!("Looking for Steam directory...");
    let paths = match &config.steam_dir {
        Some(dir) => Paths::with_base(dir),
        None => Paths::new().map_err(|e| GridError::Library(e.to_string()))?,
    };
    tracing::debug!(steam = %paths.base_dir().display(), "using Steam installation");

    let provider = build_provider(&config)?;
    let library = SteamLibrary::new(paths);
    let pipeline = Pipeline::new(config.pipeline_config(), &provider, &overlays);

    let (events_tx, events_rx) = mpsc::channel(64);
    let printer = tokio::spawn(print_events(events_rx));

    println!("Loading users...");
    let result = pipeline.run(&library, &events_tx).await;
    drop(events_tx);
    printer.await?;

    let summary = result?;
    print!("{}", report::render(&summary));
    Ok(())
}

/// Builds the Steam CDN provider with the configured search backend.
fn build_provider(config: &Config) -> anyhow::Result<HttpImageProvider> {
    let http = build_http_client(&HttpConfig {
        header_timeout: config.header_timeout(),
        ..HttpConfig::default()
    })?;

    let search = match config.api_key() {
        Some(key) => SearchBackend::SteamGridDb(SteamGridDb::new(http.clone(), key)?),
        None if config.search_url.contains("{query}") => {
            SearchBackend::Web(WebImageSearch::new(http.clone(), config.search_url.clone()))
        }
        None => {
            tracing::warn!(url = %config.search_url, "search_url has no {{query}}, search disabled");
            SearchBackend::Disabled
        }
    };

    Ok(HttpImageProvider::new(SteamCdn::new(http), search))
}

async fn print_events(mut events: mpsc::Receiver<PipelineEvent>) {
    while let Some(event) = events.recv().await {
        println!("{}", report::describe(&event));
    }
}
