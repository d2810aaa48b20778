//! Command implementations for the catalog CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use catalog_engine::{CommandEngineClient, CommandIndexer, EngineClient};
use catalog_service::{BrowseFlag, CatalogService, RebuildCoordinator};
use catalog_tree::AddressCodec;
use catalog_types::{CatalogConfig, Entry};

/// Initialize logging from `RUST_LOG` or the given level (default `info`).
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.unwrap_or("info")));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn bootstrap(
    config_path: Option<&Path>,
) -> Result<(CatalogConfig, Arc<RebuildCoordinator>, CatalogService)> {
    let config = CatalogConfig::load(config_path).context("failed to load configuration")?;
    config.validate()?;
    let roots = config.accessible_media_dirs()?;

    let engine: Arc<dyn EngineClient> = Arc::new(CommandEngineClient::new(&config.engine)?);
    let indexer = CommandIndexer::new(&config.indexer, config.cache_dir.as_deref());
    let coordinator = Arc::new(RebuildCoordinator::new(roots, indexer, Arc::clone(&engine)));
    let service = CatalogService::new(
        Arc::clone(&coordinator),
        AddressCodec::new(&config.object_root),
        engine,
    );
    Ok((config, coordinator, service))
}

fn print_entries(entries: &[Entry]) -> Result<()> {
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

/// Run the index pipeline to completion and rebuild the tree.
pub fn handle_index(config: Option<&Path>, rebuild: bool) -> Result<()> {
    let (_config, coordinator, _service) = bootstrap(config)?;
    info!(rebuild, "starting index pipeline");
    if !coordinator.run_once(rebuild) {
        bail!("index pipeline already running");
    }
    let status = coordinator.status();
    if !status.ok {
        bail!(
            "index pipeline failed: {}",
            status.message.unwrap_or_default()
        );
    }
    let snapshot = coordinator
        .snapshot()
        .context("pipeline succeeded but published no tree")?;
    println!(
        "indexed {} documents into {} nodes",
        snapshot.store().len(),
        snapshot.node_count()
    );
    Ok(())
}

/// Browse a container (or describe one object) against the current index.
pub fn handle_browse(
    config: Option<&Path>,
    objid: Option<&str>,
    meta: bool,
    offset: usize,
    count: usize,
) -> Result<()> {
    let (_config, coordinator, service) = bootstrap(config)?;
    if !coordinator.load() {
        bail!("index pipeline already running");
    }
    let objid = objid.map(str::to_string).unwrap_or_else(|| service.root_id());
    let flag = if meta {
        BrowseFlag::Metadata
    } else {
        BrowseFlag::Children
    };
    let entries = service.browse(&objid, flag, offset, count)?;
    print_entries(&entries)
}

/// Search the collection, optionally scoped to a container.
pub fn handle_search(config: Option<&Path>, objid: Option<&str>, criteria: &str) -> Result<()> {
    let (_config, coordinator, service) = bootstrap(config)?;
    if !coordinator.load() {
        bail!("index pipeline already running");
    }
    let objid = objid.map(str::to_string).unwrap_or_else(|| service.root_id());
    let entries = service.search(&objid, criteria)?;
    print_entries(&entries)
}

/// Build a tree from the current index and report its health.
pub fn handle_status(config: Option<&Path>) -> Result<()> {
    let (config, coordinator, _service) = bootstrap(config)?;
    coordinator.load();
    let status = coordinator.status();
    println!("name: {}", config.friendly_name);
    println!("state: {}", status.state);
    println!("ok: {}", status.ok);
    if let Some(message) = &status.message {
        println!("message: {message}");
    }
    if let Some(snapshot) = coordinator.snapshot() {
        println!("documents: {}", snapshot.store().len());
        println!("nodes: {}", snapshot.node_count());
        println!("playlists: {}", snapshot.playlist_nodes().len());
    }
    if let Some(when) = status.last_build {
        println!("built: {when}");
    }
    Ok(())
}
