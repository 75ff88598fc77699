//! Command handlers.

pub mod activity;
pub mod auth;
pub mod check;
pub mod comment;
pub mod completions;
pub mod init;
pub mod plans;
pub mod progress;
pub mod show;

use crate::output::{OutputMode, fail};
use anyhow::Result;
use lectio_core::config::ProjectConfig;
use lectio_core::plan::{self, Plan};

/// Resolve the plan from an explicit flag or the project config.
///
/// An unknown plan id is a routing error: the command stops instead of
/// falling back to a default plan.
pub fn resolve_plan(
    flag: Option<&str>,
    config: &ProjectConfig,
    output: OutputMode,
) -> Result<Plan> {
    let plan_id = flag.unwrap_or(&config.plan.default);
    plan::generate(plan_id).map_err(|e| fail(output, &e))
}
