//! `lct progress` — plan completion summary.

use crate::cmd::resolve_plan;
use crate::output::{OutputMode, render};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use lectio_core::progress::{self, ProgressSummary};
use lectio_core::session::Identity;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

const BAR_WIDTH: usize = 30;

#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// Plan to summarize (defaults to the configured plan).
    #[arg(long)]
    pub plan: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProgressOutput {
    plan: String,
    signed_in: bool,
    summary: ProgressSummary,
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn run_progress(args: &ProgressArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;
    let user = workspace.session().current_user();

    let plan = resolve_plan(args.plan.as_deref(), &workspace.config, output)?;
    let summary = progress::load_summary(&store, user.as_ref().map(|u| u.id.as_str()), &plan);

    let result = ProgressOutput {
        plan: plan.id().to_string(),
        signed_in: user.is_some(),
        summary,
    };

    render(output, &result, |r, w| {
        writeln!(
            w,
            "{} {}/{} readings completed ({}%) · {}",
            bar(r.summary.percent),
            r.summary.completed,
            r.summary.total,
            r.summary.percent,
            r.summary.status
        )?;
        if !r.signed_in {
            writeln!(w, "(sign in with `lct signin <name>` to track progress)")?;
        }
        Ok(())
    })
}
