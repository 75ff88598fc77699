//! `lct activity` — the cursor-paginated social feed.

use crate::output::{OutputMode, fail, render};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use lectio_core::error::Error;
use lectio_core::feed;
use lectio_core::store::Cursor;
use lectio_core::view::{self, FeedLine};
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Events per page (defaults to the configured feed page size).
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Resume cursor printed by the previous page.
    #[arg(long)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct ActivityOutput {
    items: Vec<FeedLine>,
    /// Present iff the page was full; absent means the feed is exhausted.
    next_cursor: Option<String>,
}

pub fn run_activity(args: &ActivityArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;

    let cursor: Option<Cursor> = match args.cursor.as_deref() {
        Some(raw) => Some(
            raw.parse()
                .map_err(|e| fail(output, &Error::Store(e)))?,
        ),
        None => None,
    };

    let page_size = args.page_size.unwrap_or(workspace.config.feed.page_size);
    let page = feed::page(&store, page_size, cursor);

    let result = ActivityOutput {
        items: page.items.iter().map(view::feed_line).collect(),
        next_cursor: page.next_cursor.map(|c| c.token()),
    };

    render(output, &result, |r, w| {
        if r.items.is_empty() {
            writeln!(w, "(no activity yet)")?;
            return Ok(());
        }

        for line in &r.items {
            writeln!(w, "• {}", line.text)?;
            if let Some(preview) = &line.preview {
                writeln!(w, "  \"{preview}\"")?;
            }
            writeln!(
                w,
                "  {} · lct show --plan {} --date {}",
                line.time, line.plan_id, line.date
            )?;
        }

        if let Some(cursor) = &r.next_cursor {
            writeln!(w, "\nmore: lct activity --cursor {cursor}")?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::{ActivityArgs, run_activity};
    use crate::cmd::init::{InitArgs, run_init};
    use crate::output::OutputMode;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        run_init(&InitArgs { force: false }, OutputMode::Json, dir.path()).expect("init");
        dir
    }

    #[test]
    fn empty_feed_renders_without_error() {
        let dir = project();
        let args = ActivityArgs {
            page_size: None,
            cursor: None,
        };
        run_activity(&args, OutputMode::Json, dir.path()).expect("activity succeeds");
    }

    #[test]
    fn garbage_cursors_are_rejected() {
        let dir = project();
        let args = ActivityArgs {
            page_size: None,
            cursor: Some("not-a-cursor".to_string()),
        };
        assert!(run_activity(&args, OutputMode::Json, dir.path()).is_err());
    }
}
