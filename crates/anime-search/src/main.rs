//! anime-search terminal client.

use anime_search::{App, Flow, Route, SearchController, SharedStore};
use anyhow::{Context, Result};
use catalog::JikanClient;
use clap::Parser;
use shared::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search the anime catalog from the terminal", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Start with this query instead of the landing search
    #[arg(short, long)]
    query: Option<String>,

    /// Open the detail view for this MAL ID on start
    #[arg(long)]
    open: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Nothing is subscribed yet, so problems found before logging starts are
    // collected and logged right after init.
    let config_found = args.config.exists();
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let (configured_level, level_error) = match config.log_level() {
        Ok(level) => (level, None),
        Err(e) => (tracing::Level::INFO, Some(e)),
    };
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        configured_level
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "anime-search".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %args.config.display(), "anime-search starting");
    if !config_found {
        warn!(path = %args.config.display(), "Config file not found, using defaults");
    }
    if let Some(e) = level_error {
        warn!(error = %e, "Using info log level");
    }

    let client = JikanClient::new(
        config.catalog.base_url.clone(),
        &config.catalog.user_agent,
        config.request_timeout(),
    )
    .context("Failed to create Jikan client")?;
    let catalog = Arc::new(client);

    let store = SharedStore::new();
    let (controller, mut events) =
        SearchController::new(catalog.clone(), store, config.debounce());
    let mut app = App::new(catalog, controller, config.search.page_size);

    match args.query.as_deref() {
        Some(query) => app.controller_mut().on_query_changed(query),
        None => app.controller_mut().start(),
    }

    println!("{}", anime_search::app::HELP);

    if let Some(id) = args.open {
        let route = Route::Detail { id }.to_string();
        if let Flow::Continue(Some(output)) = app.handle_line(&route).await {
            println!("{}", output);
        }
        if let Some(output) = app.settle().await {
            println!("{}", output);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match app.handle_line(&line).await {
                    Flow::Continue(Some(output)) => println!("{}", output),
                    Flow::Continue(None) => {}
                    Flow::Quit => break,
                }
                if let Some(output) = app.settle().await {
                    println!("{}", output);
                }
            }
            Some(event) = events.recv() => {
                if let Some(output) = app.handle_event(&event) {
                    println!("{}", output);
                }
            }
        }
    }

    app.controller_mut().shutdown();
    info!("anime-search finished");

    Ok(())
}
