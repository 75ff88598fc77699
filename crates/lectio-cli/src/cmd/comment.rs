//! `lct comment` and `lct comments` — post to and read a day's thread.

use crate::cmd::resolve_plan;
use crate::output::{CliError, OutputMode, fail, render, render_error};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::{Args, Subcommand};
use lectio_core::comment::{self, Comment};
use lectio_core::model::date::PlanDate;
use lectio_core::session::Identity;
use lectio_core::view;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    #[command(
        about = "Post a comment on a day's readings",
        after_help = "EXAMPLES:\n    # Comment on March 5th\n    lct comment add 3/5 \"Loved the Psalm today\"\n\n    # Comment on another plan's day\n    lct comment add 3/5 \"note\" --plan mcheyne"
    )]
    Add(CommentAddArgs),
}

#[derive(Args, Debug)]
pub struct CommentAddArgs {
    /// Day to comment on, as M/D.
    pub date: String,

    /// Comment body.
    pub body: String,

    /// Plan the day belongs to (defaults to the configured plan).
    #[arg(long)]
    pub plan: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    /// Day to show comments for, as M/D.
    pub date: String,

    /// Plan the day belongs to (defaults to the configured plan).
    #[arg(long)]
    pub plan: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentAddOutput {
    ok: bool,
    id: String,
    plan: String,
    date: PlanDate,
    body: String,
}

fn parse_date(raw: &str, output: OutputMode) -> Result<PlanDate> {
    raw.parse().map_err(|e| {
        let _ = render_error(
            output,
            &CliError::with_details(
                format!("{e}"),
                "Dates look like 3/5 (month/day)",
                "invalid_date",
            ),
        );
        anyhow::anyhow!("{e}")
    })
}

pub fn run_comment(args: &CommentArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    match &args.command {
        CommentCommand::Add(add) => run_comment_add(add, output, project_root),
    }
}

fn run_comment_add(args: &CommentAddArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;
    let user = workspace.session().current_user();

    let plan = resolve_plan(args.plan.as_deref(), &workspace.config, output)?;
    let date = parse_date(&args.date, output)?;

    let id = comment::post(&store, user.as_ref(), plan.id(), date, &args.body)
        .map_err(|e| fail(output, &e))?;

    let result = CommentAddOutput {
        ok: true,
        id,
        plan: plan.id().to_string(),
        date,
        body: args.body.trim().to_string(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ comment added to {} ({})", r.date, r.plan)
    })
}

pub fn run_comments(args: &CommentsArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let store = workspace.store()?;

    let plan = resolve_plan(args.plan.as_deref(), &workspace.config, output)?;
    let date = parse_date(&args.date, output)?;

    let comments: Vec<Comment> = comment::thread(&store, plan.id(), date);

    render(output, &comments, |rows, w| {
        if rows.is_empty() {
            writeln!(w, "(no comments for {date})")?;
            return Ok(());
        }

        writeln!(w, "Comments on {date}:")?;
        for row in rows {
            writeln!(
                w,
                "- [{}] {}: {}",
                view::format_event_time(row.timestamp_us),
                row.user_name,
                row.body
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::{
        CommentAddArgs, CommentArgs, CommentCommand, CommentsArgs, run_comment, run_comments,
    };
    use crate::cmd::init::{InitArgs, run_init};
    use crate::output::OutputMode;
    use clap::Parser;
    use lectio_core::session::LocalSession;
    use std::path::Path;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        cmd: CommentCommand,
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        run_init(&InitArgs { force: false }, OutputMode::Json, dir.path()).expect("init");
        dir
    }

    fn sign_in(root: &Path) {
        LocalSession::at(root.join(".lectio/session.json"))
            .sign_in("Test Reader")
            .expect("sign in");
    }

    #[test]
    fn comment_add_args_parse() {
        let parsed = Wrapper::parse_from(["test", "add", "3/5", "Loved the Psalm today"]);
        match parsed.cmd {
            CommentCommand::Add(args) => {
                assert_eq!(args.date, "3/5");
                assert_eq!(args.body, "Loved the Psalm today");
            }
        }
    }

    #[test]
    fn signed_out_comment_is_rejected() {
        let dir = project();
        let args = CommentArgs {
            command: CommentCommand::Add(CommentAddArgs {
                date: "3/5".to_string(),
                body: "hello".to_string(),
                plan: None,
            }),
        };
        assert!(run_comment(&args, OutputMode::Json, dir.path()).is_err());
    }

    #[test]
    fn empty_comment_is_rejected() {
        let dir = project();
        sign_in(dir.path());

        let args = CommentArgs {
            command: CommentCommand::Add(CommentAddArgs {
                date: "3/5".to_string(),
                body: "   ".to_string(),
                plan: None,
            }),
        };
        assert!(run_comment(&args, OutputMode::Json, dir.path()).is_err());
    }

    #[test]
    fn posted_comments_show_in_the_thread() {
        let dir = project();
        sign_in(dir.path());

        let add = CommentArgs {
            command: CommentCommand::Add(CommentAddArgs {
                date: "3/5".to_string(),
                body: "Loved the Psalm today".to_string(),
                plan: None,
            }),
        };
        run_comment(&add, OutputMode::Json, dir.path()).expect("comment posts");

        let list = CommentsArgs {
            date: "3/5".to_string(),
            plan: None,
        };
        run_comments(&list, OutputMode::Json, dir.path()).expect("thread lists");
    }
}
