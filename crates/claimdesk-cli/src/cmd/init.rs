//! `claimdesk init` — create the workspace skeleton.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use claimdesk_core::{Store, config};

use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.claimdesk/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "# claimdesk project configuration\n\
    # output = \"json\"\n\
    \n\
    [intake]\n\
    default_claim_type = \"incident\"\n";

const GITIGNORE: &str = "claimdesk.sqlite3\nclaimdesk.sqlite3-wal\nclaimdesk.sqlite3-shm\n";

/// Execute `claimdesk init`. Creates the workspace skeleton:
///
/// ```text
/// .claimdesk/
///   claimdesk.sqlite3   (created and migrated on first open)
///   config.toml         (default config template)
///   .gitignore          (sqlite database and WAL sidecars)
/// ```
///
/// # Errors
///
/// Returns an error if `.claimdesk/` already exists and `--force` is not
/// set, or if any filesystem or store operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store_dir = project_root.join(config::STORE_DIR_NAME);
    if store_dir.exists() && !args.force {
        anyhow::bail!(".claimdesk/ already exists. Use `claimdesk init --force` to reinitialize.");
    }

    let store_dir = config::init_store_dir(project_root)?;

    let config_path = store_dir.join(config::CONFIG_FILE_NAME);
    if !config_path.exists() {
        std::fs::write(&config_path, CONFIG_TOML)?;
    }
    std::fs::write(store_dir.join(".gitignore"), GITIGNORE)?;

    // Opening runs the schema migrations.
    Store::open(&config::store_path(&store_dir))?;

    render_success(
        output,
        &format!("initialized claimdesk workspace at {}", store_dir.display()),
    )
}
