//! `lct check` / `lct uncheck` — toggle a reading's completion.

use crate::output::{OutputMode, fail, render};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use lectio_core::error::Error;
use lectio_core::model::reading::ReadingId;
use lectio_core::plan;
use lectio_core::progress::{self, ProgressSummary, ToggleOutcome};
use lectio_core::session::Identity;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Reading id, e.g. mcheyne-64-2 (shown by `lct show`).
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ToggleOutput {
    ok: bool,
    id: String,
    name: String,
    completed: bool,
    summary: ProgressSummary,
}

pub fn run_check(args: &CheckArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    run_toggle(&args.id, true, output, project_root)
}

pub fn run_uncheck(args: &CheckArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    run_toggle(&args.id, false, output, project_root)
}

fn run_toggle(raw_id: &str, completed: bool, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;
    let user = workspace.session().current_user();

    let id: ReadingId = raw_id
        .parse()
        .map_err(|_| fail(output, &Error::UnknownReading(raw_id.to_string())))?;
    let (plan_id, _, _) = id
        .parts()
        .ok_or_else(|| fail(output, &Error::UnknownReading(raw_id.to_string())))?;

    let plan = plan::generate(plan_id).map_err(|e| fail(output, &e))?;
    let Some(reading) = plan.reading(&id) else {
        return Err(fail(output, &Error::UnknownReading(raw_id.to_string())));
    };

    let outcome = progress::toggle_reading(&store, user.as_ref(), &plan, reading, completed)
        .map_err(|e| fail(output, &e))?;

    match outcome {
        // The checkbox reverts: nothing was written, the command fails
        // loudly so scripts notice.
        ToggleOutcome::SignedOut => Err(fail(output, &Error::NotSignedIn)),
        ToggleOutcome::Saved(summary) => {
            let result = ToggleOutput {
                ok: true,
                id: id.to_string(),
                name: reading.name.clone(),
                completed,
                summary,
            };
            render(output, &result, |r, w| {
                let verb = if r.completed { "checked" } else { "unchecked" };
                writeln!(
                    w,
                    "✓ {} {verb} — {}/{} readings completed ({}%)",
                    r.name, r.summary.completed, r.summary.total, r.summary.percent
                )
            })
        }
    }
}
