//! Command handlers, one module per command family.

pub mod area;
pub mod backfill;
pub mod claim;
pub mod comment;
pub mod feedback;
pub mod init;
pub mod project;
pub mod timeline;
pub mod user;

use anyhow::{Context, Result};
use claimdesk_core::config::{self, Config};
use claimdesk_core::Store;
use std::path::Path;

/// Locate the enclosing workspace and open its store.
pub fn open_store(project_root: &Path) -> Result<Store> {
    Ok(open_workspace(project_root)?.0)
}

/// Locate the enclosing workspace, open its store, and load its config.
pub fn open_workspace(project_root: &Path) -> Result<(Store, Config)> {
    let store_dir = config::find_store_dir(project_root)
        .context("no .claimdesk/ directory found here or above; run `claimdesk init` first")?;
    let store = Store::open(&config::store_path(&store_dir))?;
    let cfg = config::load_config(&store_dir)?;
    Ok((store, cfg))
}
