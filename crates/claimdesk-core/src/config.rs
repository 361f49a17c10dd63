//! Store-directory discovery and project configuration.
//!
//! A claimdesk workspace is marked by a `.claimdesk/` directory holding the
//! SQLite database and an optional `config.toml`. Discovery walks up from
//! the starting directory, git-style, so commands work from anywhere inside
//! the workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const STORE_DIR_NAME: &str = ".claimdesk";
pub const STORE_FILE_NAME: &str = "claimdesk.sqlite3";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preferred output mode for the CLI ("human" or "json"). The CLI flag
    /// still wins.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Claim type offered when the caller does not pass one.
    #[serde(default = "default_claim_type")]
    pub default_claim_type: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            default_claim_type: default_claim_type(),
        }
    }
}

fn default_claim_type() -> String {
    "incident".to_string()
}

/// Walk up from `start` looking for a `.claimdesk/` directory.
#[must_use]
pub fn find_store_dir(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(STORE_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Path of the SQLite database inside a store directory.
#[must_use]
pub fn store_path(store_dir: &Path) -> PathBuf {
    store_dir.join(STORE_FILE_NAME)
}

/// Create the `.claimdesk/` directory under `root` if needed and return it.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn init_store_dir(root: &Path) -> Result<PathBuf> {
    let store_dir = root.join(STORE_DIR_NAME);
    std::fs::create_dir_all(&store_dir)?;
    Ok(store_dir)
}

/// Load `config.toml` from a store directory, falling back to defaults when
/// the file is absent.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or a config error if it
/// does not parse.
pub fn load_config(store_dir: &Path) -> Result<Config> {
    let path = store_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_walks_up_to_the_marker() {
        let root = tempfile::tempdir().expect("temp dir");
        let store_dir = init_store_dir(root.path()).expect("init");
        let nested = root.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("create nested");

        assert_eq!(find_store_dir(&nested), Some(store_dir.clone()));
        assert_eq!(find_store_dir(root.path()), Some(store_dir));
    }

    #[test]
    fn discovery_fails_outside_a_workspace() {
        let root = tempfile::tempdir().expect("temp dir");
        assert_eq!(find_store_dir(root.path()), None);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let store_dir = init_store_dir(root.path()).expect("init");
        let cfg = load_config(&store_dir).expect("load");
        assert!(cfg.output.is_none());
        assert_eq!(cfg.intake.default_claim_type, "incident");
    }

    #[test]
    fn config_file_overrides_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let store_dir = init_store_dir(root.path()).expect("init");
        std::fs::write(
            store_dir.join(CONFIG_FILE_NAME),
            "output = \"json\"\n\n[intake]\ndefault_claim_type = \"outage\"\n",
        )
        .expect("write config");

        let cfg = load_config(&store_dir).expect("load");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.intake.default_claim_type, "outage");
    }

    #[test]
    fn init_is_idempotent() {
        let root = tempfile::tempdir().expect("temp dir");
        let first = init_store_dir(root.path()).expect("first init");
        let second = init_store_dir(root.path()).expect("second init");
        assert_eq!(first, second);
    }
}
