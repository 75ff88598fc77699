//! `lct plans` — list the plans this build can generate.

use crate::output::{OutputMode, render};
use anyhow::Result;
use lectio_core::nav;
use lectio_core::plan::{self, KNOWN_PLANS};
use serde::Serialize;
use std::io::Write as _;

#[derive(Debug, Serialize)]
struct PlanRow {
    id: String,
    readings: usize,
    days: usize,
}

pub fn run_plans(output: OutputMode) -> Result<()> {
    let mut rows = Vec::new();
    for name in KNOWN_PLANS {
        let plan = plan::generate(name)?;
        rows.push(PlanRow {
            id: plan.id().to_string(),
            readings: plan.total(),
            days: nav::distinct_dates(&plan).len(),
        });
    }

    render(output, &rows, |rows, w| {
        for row in rows {
            writeln!(
                w,
                "{} — {} readings across {} days",
                row.id, row.readings, row.days
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::run_plans;
    use crate::output::OutputMode;

    #[test]
    fn plans_lists_without_a_project() {
        run_plans(OutputMode::Json).expect("plans succeeds");
    }
}
