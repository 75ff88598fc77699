//! `lct signin` / `lct signout` / `lct whoami` — local session management.

use crate::output::{CliError, OutputMode, render, render_error};
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use lectio_core::session::{Identity, User};
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SigninArgs {
    /// Display name to sign in as.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct SigninOutput {
    ok: bool,
    user: User,
}

#[derive(Debug, Serialize)]
struct WhoamiOutput {
    signed_in: bool,
    user: Option<User>,
}

pub fn run_signin(args: &SigninArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;

    let name = args.name.trim();
    if name.is_empty() {
        let msg = "display name must not be empty";
        render_error(
            output,
            &CliError::with_details(msg, "Pass a name: lct signin \"Jane\"", "invalid_name"),
        )?;
        anyhow::bail!(msg);
    }

    let user = match workspace.session().sign_in(name) {
        Ok(user) => user,
        Err(e) => {
            // Sign-in is user-initiated: failure gets a visible message.
            render_error(output, &CliError::new(format!("sign-in failed: {e:#}")))?;
            return Err(e);
        }
    };
    tracing::info!("signed in as {} ({})", user.display_name, user.id);

    let result = SigninOutput { ok: true, user };
    render(output, &result, |r, w| {
        writeln!(w, "✓ signed in as {}", r.user.display_name)
    })
}

pub fn run_signout(output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    workspace.session().sign_out()?;

    render(output, &serde_json::json!({ "ok": true }), |_, w| {
        writeln!(w, "✓ signed out")
    })
}

pub fn run_whoami(output: OutputMode, project_root: &Path) -> Result<()> {
    let workspace = Workspace::require(project_root, output)?;
    let user = workspace.session().current_user();

    let result = WhoamiOutput {
        signed_in: user.is_some(),
        user,
    };
    render(output, &result, |r, w| match &r.user {
        Some(user) => writeln!(w, "{} ({})", user.display_name, user.id),
        None => writeln!(w, "not signed in"),
    })
}

#[cfg(test)]
mod tests {
    use super::{SigninArgs, run_signin, run_signout, run_whoami};
    use crate::cmd::init::{InitArgs, run_init};
    use crate::output::OutputMode;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        run_init(&InitArgs { force: false }, OutputMode::Json, dir.path()).expect("init");
        dir
    }

    #[test]
    fn signin_signout_cycle() {
        let dir = project();

        run_whoami(OutputMode::Json, dir.path()).expect("whoami while signed out");

        let args = SigninArgs {
            name: "Jane".to_string(),
        };
        run_signin(&args, OutputMode::Json, dir.path()).expect("signin succeeds");
        run_whoami(OutputMode::Json, dir.path()).expect("whoami while signed in");
        run_signout(OutputMode::Json, dir.path()).expect("signout succeeds");
    }

    #[test]
    fn blank_names_are_rejected() {
        let dir = project();
        let args = SigninArgs {
            name: "   ".to_string(),
        };
        assert!(run_signin(&args, OutputMode::Json, dir.path()).is_err());
    }
}
