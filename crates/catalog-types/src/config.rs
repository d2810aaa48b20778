//! Configuration loading for the media catalog.
//!
//! Layered: defaults -> config file -> environment variables. The config file
//! lives at the platform config dir for `media-catalog` (config.toml) unless
//! an explicit path is given.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CatalogError;

/// Settings for the out-of-process index (re)build command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerSettings {
    /// Command run to update the index.
    #[serde(default = "default_indexer_command")]
    pub command: String,

    /// Arguments always passed to the command. The configuration directory
    /// and media roots are appended by the runner.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra flag appended for a from-scratch rebuild.
    #[serde(default = "default_rebuild_flag")]
    pub rebuild_flag: String,
}

fn default_indexer_command() -> String {
    "recollindex".to_string()
}

fn default_rebuild_flag() -> String {
    "-z".to_string()
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            command: default_indexer_command(),
            args: Vec::new(),
            rebuild_flag: default_rebuild_flag(),
        }
    }
}

/// Settings for the engine query adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Command producing one JSON document per line for a query passed as
    /// the last argument. Empty means no subprocess adapter is configured.
    #[serde(default)]
    pub query_command: Vec<String>,
}

/// Top-level catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Name announced to clients.
    #[serde(default = "default_friendly_name")]
    pub friendly_name: String,

    /// Content roots indexed by the engine. Root-level children of the tree
    /// are keyed by these absolute paths.
    #[serde(default)]
    pub media_dirs: Vec<PathBuf>,

    /// Engine configuration/cache directory. Defaults to the platform cache
    /// dir for media-catalog.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Fixed prefix for object identifiers issued by this deployment.
    #[serde(default = "default_object_root")]
    pub object_root: String,

    #[serde(default)]
    pub indexer: IndexerSettings,

    #[serde(default)]
    pub engine: EngineSettings,
}

fn default_friendly_name() -> String {
    "media-catalog".to_string()
}

fn default_object_root() -> String {
    "0$catalog$".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            friendly_name: default_friendly_name(),
            media_dirs: Vec::new(),
            cache_dir: None,
            object_root: default_object_root(),
            indexer: IndexerSettings::default(),
            engine: EngineSettings::default(),
        }
    }
}

impl CatalogConfig {
    /// Default config file path (~/.config/media-catalog/config.toml or the
    /// platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "spillwave", "media-catalog")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration: defaults, then the config file if present, then
    /// `CATALOG_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let mut builder = Config::builder();

        let file = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path);
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }

        let cfg = builder
            .add_source(Environment::with_prefix("CATALOG").separator("__"))
            .build()?;

        let mut loaded: CatalogConfig = cfg.try_deserialize()?;
        if loaded.cache_dir.is_none() {
            loaded.cache_dir = ProjectDirs::from("com", "spillwave", "media-catalog")
                .map(|dirs| dirs.cache_dir().to_path_buf());
        }
        Ok(loaded)
    }

    /// Media roots that actually exist, normalized without trailing
    /// separators. Inaccessible entries are dropped with a warning; an empty
    /// result is a configuration error.
    pub fn accessible_media_dirs(&self) -> Result<Vec<PathBuf>, CatalogError> {
        let mut good = Vec::new();
        for dir in &self.media_dirs {
            if dir.is_dir() {
                let s = dir.to_string_lossy();
                good.push(PathBuf::from(s.trim_end_matches('/')));
            } else {
                warn!(dir = %dir.display(), "media directory is not accessible");
            }
        }
        if good.is_empty() {
            return Err(CatalogError::Config(
                "no accessible media directories in configuration".to_string(),
            ));
        }
        Ok(good)
    }

    /// Validate static settings.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.media_dirs.is_empty() {
            return Err(CatalogError::Config(
                "media_dirs must not be empty".to_string(),
            ));
        }
        if !self.object_root.ends_with('$') {
            return Err(CatalogError::Config(
                "object_root must end with '$'".to_string(),
            ));
        }
        Ok(())
    }
}
