use crate::catalog::CatalogSource;
use crate::pipeline::SortKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog location used when neither the CLI nor the config names one.
pub const DEFAULT_CATALOG: &str = "catalog.json";

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "game-catalog.log";

/// User configuration, read from `<config dir>/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path or URL of the catalog.
    pub catalog: Option<String>,
    pub log_file: Option<PathBuf>,
    /// Sort applied after load, e.g. `"year_desc"`.
    pub default_sort: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "gamecatalog", "game-catalog")
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file is not an error and yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// CLI value, then config value, then [`DEFAULT_CATALOG`].
    pub fn catalog_source(&self, cli: Option<&str>) -> CatalogSource {
        let location = cli
            .or(self.catalog.as_deref())
            .unwrap_or(DEFAULT_CATALOG);
        CatalogSource::parse(location)
    }

    /// CLI value, then config value, then the cache directory.
    pub fn log_path(&self, cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| self.log_file.clone())
            .or_else(|| project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE)))
    }

    /// Initial sort key. Unknown names are logged and ignored.
    pub fn sort_key(&self, cli: Option<&str>) -> Option<SortKey> {
        let name = cli.or(self.default_sort.as_deref())?;
        let key = SortKey::parse(name);
        if key.is_none() {
            log::warn!("Ignoring unknown sort key {:?}", name);
        }
        key
    }
}
