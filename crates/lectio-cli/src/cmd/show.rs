//! `lct show` — the day page: readings, check state, navigation, comments.

use crate::cmd::resolve_plan;
use crate::output::{CliError, OutputMode, fail, render, render_error};
use crate::workspace::Workspace;
use anyhow::Result;
use chrono::{Datelike, Local};
use clap::Args;
use lectio_core::comment::{self, Comment};
use lectio_core::error::Error;
use lectio_core::model::date::PlanDate;
use lectio_core::nav;
use lectio_core::plan::Plan;
use lectio_core::progress::{self, ProgressRecord};
use lectio_core::session::Identity;
use lectio_core::store::DocumentStore;
use lectio_core::view::{self, DayView};
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Plan to show (defaults to the configured plan).
    #[arg(long)]
    pub plan: Option<String>,

    /// Day to show as M/D. Defaults to the first incomplete day when signed
    /// in, today otherwise.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    signed_in: bool,
    day: DayView,
    comments: Vec<Comment>,
}

/// Today mapped onto the fixed plan calendar. Feb 29 lands on 3/1, the
/// next date the plan actually schedules.
fn today_on_plan() -> PlanDate {
    let now = Local::now();
    #[allow(clippy::cast_possible_truncation)]
    let (month, day) = (now.month() as u8, now.day() as u8);
    PlanDate::new(month, day)
        .or_else(|| PlanDate::new(3, 1))
        .unwrap_or_else(|| PlanDate::new(1, 1).expect("1/1 is always valid"))
}

fn load_record_degraded(store: &dyn DocumentStore, user_id: &str) -> ProgressRecord {
    match progress::load_record(store, user_id) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("progress unavailable, showing unchecked boxes: {e}");
            ProgressRecord::default()
        }
    }
}

fn resolve_date(
    explicit: Option<&str>,
    record: &ProgressRecord,
    plan: &Plan,
    signed_in: bool,
    output: OutputMode,
) -> Result<PlanDate> {
    if let Some(raw) = explicit {
        return raw.parse().map_err(|e| {
            let _ = render_error(
                output,
                &CliError::with_details(
                    format!("{e}"),
                    "Dates look like 3/5 (month/day)",
                    "invalid_date",
                ),
            );
            anyhow::anyhow!("{e}")
        });
    }

    if signed_in && let Some(date) = nav::first_incomplete_date(record, plan) {
        return Ok(date);
    }

    Ok(today_on_plan())
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;
    let user = workspace.session().current_user();

    let plan = resolve_plan(args.plan.as_deref(), &workspace.config, output)?;

    let record = user.as_ref().map_or_else(ProgressRecord::default, |u| {
        load_record_degraded(&store, &u.id)
    });

    let date = resolve_date(
        args.date.as_deref(),
        &record,
        &plan,
        user.is_some(),
        output,
    )?;

    let Some(day) = view::day_view(&plan, date, &record) else {
        return Err(fail(output, &Error::UnknownDate(date)));
    };

    let comments = comment::thread(&store, plan.id(), date);

    let result = ShowOutput {
        signed_in: user.is_some(),
        day,
        comments,
    };

    render(output, &result, |r, w| {
        writeln!(
            w,
            "Day {} · {} — {}",
            r.day.day_of_year, r.day.heading, r.day.plan_id
        )?;
        writeln!(w, "{:-<width$}", "", width = 60)?;

        for reading in &r.day.readings {
            let mark = if reading.completed { "x" } else { " " };
            writeln!(w, "[{mark}] {:<24} {}", reading.name, reading.id)?;
            writeln!(w, "    {}", reading.passage_url)?;
        }

        let previous = r.day.nav.previous.map_or_else(
            || "(at first day)".to_string(),
            |d| format!("lct show --date {d}"),
        );
        let next = r.day.nav.next.map_or_else(
            || "(at last day)".to_string(),
            |d| format!("lct show --date {d}"),
        );
        writeln!(w, "\nprevious: {previous}")?;
        writeln!(w, "next:     {next}")?;

        if r.comments.is_empty() {
            writeln!(w, "\n(no comments for {})", r.day.date)?;
        } else {
            writeln!(w, "\nComments on {}:", r.day.date)?;
            for comment in &r.comments {
                writeln!(
                    w,
                    "- [{}] {}: {}",
                    view::format_event_time(comment.timestamp_us),
                    comment.user_name,
                    comment.body
                )?;
            }
        }

        if !r.signed_in {
            writeln!(w, "\n(sign in with `lct signin <name>` to track progress)")?;
        }
        Ok(())
    })
}
