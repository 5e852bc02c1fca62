/// Config file loading and creation for the tiersort CLI.
///
/// Config lives at ~/.config/tiersort/config.toml.
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct TiersortConfig {
    pub store: Option<String>,
    pub store_path: Option<String>,
    pub endpoint: Option<String>,
    pub retries: Option<usize>,
    pub export_dir: Option<String>,
    pub items: Option<String>,
    pub total: Option<usize>,
}

/// Where rankings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// A JSON file that survives restarts.
    Local,
    /// Process memory only.
    Session,
}

impl StoreKind {
    pub fn parse(value: &str) -> Option<StoreKind> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Some(StoreKind::Local),
            "session" => Some(StoreKind::Session),
            _ => None,
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# tiersort configuration
# All values here can be overridden by CLI flags.

# Where rankings are kept: \"local\" (a file, kept between runs) or \"session\" (memory only)
# store = \"local\"

# Path of the local store file
# store_path = \"~/.local/share/tiersort/rankings.json\"

# Base URL of the item API (xkcd-style JSON)
# endpoint = \"https://xkcd.com\"

# Max retries per item fetch
# retries = 3

# Directory where `save` writes snapshot files
# export_dir = \".\"

# Rank titles from a local file instead of the item API (one per line or a JSON array)
# items = \"/path/to/titles.txt\"

# Collection size used by `tiersort stats` when no source is contacted
# total = 2500
";

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home)
}

/// Returns the default config path: ~/.config/tiersort/config.toml
pub fn config_path() -> PathBuf {
    home_dir().join(".config").join("tiersort").join("config.toml")
}

/// Returns the default store path: ~/.local/share/tiersort/rankings.json
pub fn default_store_path() -> PathBuf {
    home_dir().join(".local").join("share").join("tiersort").join("rankings.json")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(value),
    }
}

pub fn parse_config(content: &str) -> Result<TiersortConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> TiersortConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => TiersortConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_is_all_comments() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), TiersortConfig::default());
    }

    #[test]
    fn test_parse_config_fields() {
        let cfg = parse_config("store = \"session\"\nretries = 5\nendpoint = \"http://localhost:9000\"\n").unwrap();
        assert_eq!(cfg.store.as_deref(), Some("session"));
        assert_eq!(cfg.retries, Some(5));
        assert_eq!(cfg.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(cfg.export_dir.is_none());
    }

    #[test]
    fn test_parse_config_rejects_wrong_types() {
        assert!(parse_config("retries = \"many\"").is_err());
    }

    #[test]
    fn test_store_kind_parse() {
        assert_eq!(StoreKind::parse("local"), Some(StoreKind::Local));
        assert_eq!(StoreKind::parse("Session"), Some(StoreKind::Session));
        assert_eq!(StoreKind::parse("cloud"), None);
    }
}
