use crate::output::{OutputMode, render};
use crate::workspace::{DB_FILE, LECTIO_DIR, SESSION_FILE};
use anyhow::{Context as _, Result};
use clap::Args;
use lectio_core::store::SqliteStore;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.lectio/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[plan]\n\
    default = \"mcheyne\"\n\
    \n\
    [feed]\n\
    page_size = 10\n";

const GITIGNORE: &str = "lectio.db\nlectio.db-shm\nlectio.db-wal\nsession.json\n";

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    lectio_dir: String,
}

/// Execute `lct init`. Creates the project skeleton:
///
/// ```text
/// .lectio/
///   lectio.db     (document store, created eagerly)
///   config.toml   (default project config template)
///   .gitignore    (store and session files)
/// ```
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let lectio_dir = project_root.join(LECTIO_DIR);

    if lectio_dir.exists() && !args.force {
        anyhow::bail!(".lectio/ already exists. Use `lct init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&lectio_dir)
        .with_context(|| format!("create project directory {}", lectio_dir.display()))?;

    let config_path = lectio_dir.join("config.toml");
    std::fs::write(&config_path, CONFIG_TOML)
        .with_context(|| format!("write config template {}", config_path.display()))?;

    let gitignore_path = lectio_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("write {}", gitignore_path.display()))?;

    // Create the store now so the first read command does not race schema
    // creation with a concurrent write.
    SqliteStore::open(&lectio_dir.join(DB_FILE)).context("initialize document store")?;

    if args.force {
        // A forced re-init starts signed out.
        let session_path = lectio_dir.join(SESSION_FILE);
        if session_path.exists() {
            std::fs::remove_file(&session_path)
                .with_context(|| format!("remove stale session {}", session_path.display()))?;
        }
    }

    tracing::info!("initialized lectio project at {}", lectio_dir.display());

    let result = InitOutput {
        ok: true,
        lectio_dir: lectio_dir.display().to_string(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ initialized lectio project at {}", r.lectio_dir)
    })
}
