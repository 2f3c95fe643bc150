use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::query::QueryParams;

/// Snapshot to open at start-up when none is given on the command line.
pub const SNAPSHOT_ENV: &str = "BOOKSCAPE_SNAPSHOT";
/// JSON file overriding any of the [`QueryParams`] defaults.
pub const QUERY_CONFIG_ENV: &str = "BOOKSCAPE_QUERY_CONFIG";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Everything resolved once before the window opens.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub snapshot: Option<PathBuf>,
    pub query_params: QueryParams,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            query_params: QueryParams::default(),
            window_size: [1280.0, 820.0],
            min_window_size: [720.0, 480.0],
        }
    }
}

impl AppConfig {
    /// Resolve from command-line arguments (program name already skipped) and the
    /// process environment.
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Result<Self> {
        Self::resolve(
            args.next(),
            std::env::var(SNAPSHOT_ENV).ok(),
            std::env::var(QUERY_CONFIG_ENV).ok(),
        )
    }

    /// The first argument wins over the snapshot variable.
    fn resolve(
        arg: Option<String>,
        snapshot_var: Option<String>,
        query_config_var: Option<String>,
    ) -> Result<Self> {
        let snapshot = arg
            .or(snapshot_var)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let query_params = match query_config_var.filter(|s| !s.trim().is_empty()) {
            Some(path) => load_query_params(Path::new(&path))?,
            None => QueryParams::default(),
        };

        if let Some(path) = &snapshot {
            log::info!("Snapshot: {}", path.display());
        }
        log::debug!("Query parameters: {query_params:?}");

        Ok(Self {
            snapshot,
            query_params,
            ..Self::default()
        })
    }
}

/// Read query thresholds from a JSON file; keys that are left out keep their defaults.
pub fn load_query_params(path: &Path) -> Result<QueryParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading query config {}", path.display()))?;
    let params: QueryParams = serde_json::from_str(&text)
        .with_context(|| format!("parsing query config {}", path.display()))?;
    if params.top_n == 0 || params.top_authors == 0 {
        log::warn!("Query config {} asks for zero ranked rows", path.display());
    }
    Ok(params)
}
