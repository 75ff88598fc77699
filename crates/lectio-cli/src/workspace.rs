//! Project workspace discovery.
//!
//! A lectio project is any directory holding a `.lectio/` folder; commands
//! walk up from the working directory to find it, the same way git finds
//! its repository root.

use crate::output::{CliError, OutputMode, render_error};
use anyhow::{Context, Result};
use lectio_core::config::{self, ProjectConfig};
use lectio_core::session::LocalSession;
use lectio_core::store::SqliteStore;
use std::path::{Path, PathBuf};

pub const LECTIO_DIR: &str = ".lectio";
pub const DB_FILE: &str = "lectio.db";
pub const SESSION_FILE: &str = "session.json";

/// Walk up from `start` looking for a `.lectio/` directory.
pub fn find_lectio_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(LECTIO_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// An opened project: its `.lectio/` directory and parsed config.
pub struct Workspace {
    pub lectio_dir: PathBuf,
    pub config: ProjectConfig,
}

impl Workspace {
    /// Locate and open the project enclosing `start`.
    ///
    /// Renders a structured error and fails when no project exists or the
    /// project config is unreadable.
    pub fn require(start: &Path, output: OutputMode) -> Result<Self> {
        let Some(lectio_dir) = find_lectio_dir(start) else {
            let msg = "Not a lectio project: .lectio directory not found";
            let _ = render_error(
                output,
                &CliError::with_details(msg, "Run 'lct init' to create a project", "not_a_project"),
            );
            anyhow::bail!(msg);
        };

        let root = lectio_dir
            .parent()
            .map_or_else(|| start.to_path_buf(), Path::to_path_buf);
        let config = match config::load_project_config(&root) {
            Ok(config) => config,
            Err(e) => {
                let _ = render_error(
                    output,
                    &CliError::with_details(
                        format!("{e:#}"),
                        "Fix syntax in .lectio/config.toml and retry",
                        "config_parse_error",
                    ),
                );
                return Err(e);
            }
        };

        Ok(Self { lectio_dir, config })
    }

    /// Open the project's document store.
    pub fn store(&self) -> Result<SqliteStore> {
        let path = self.lectio_dir.join(DB_FILE);
        SqliteStore::open(&path).with_context(|| format!("open store {}", path.display()))
    }

    /// The project's file-backed session.
    pub fn session(&self) -> LocalSession {
        LocalSession::at(self.lectio_dir.join(SESSION_FILE))
    }
}
