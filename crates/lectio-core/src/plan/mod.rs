//! Plan generation and lookup.

pub mod mcheyne;

use crate::error::Error;
use crate::model::date::PlanDate;
use crate::model::reading::{Reading, ReadingId};

/// Names of all generatable plans.
pub const KNOWN_PLANS: &[&str] = &[mcheyne::PLAN_ID];

/// A named, ordered reading schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    id: String,
    readings: Vec<Reading>,
}

impl Plan {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Fixed reading count for progress denominators.
    #[must_use]
    pub fn total(&self) -> usize {
        self.readings.len()
    }

    /// Readings scheduled on one date, in column order.
    pub fn readings_on(&self, date: PlanDate) -> impl Iterator<Item = &Reading> {
        self.readings.iter().filter(move |r| r.date == date)
    }

    #[must_use]
    pub fn reading(&self, id: &ReadingId) -> Option<&Reading> {
        self.readings.iter().find(|r| &r.id == id)
    }

    /// First scheduled date. Plans are generated non-empty.
    #[must_use]
    pub fn first_date(&self) -> Option<PlanDate> {
        self.readings.first().map(|r| r.date)
    }
}

/// Generate a plan by name.
///
/// # Errors
///
/// Returns [`Error::UnknownPlan`] for names outside [`KNOWN_PLANS`]; the
/// caller must not fall through to a default plan (routing, not data).
pub fn generate(plan_id: &str) -> Result<Plan, Error> {
    match plan_id {
        mcheyne::PLAN_ID => Ok(Plan {
            id: mcheyne::PLAN_ID.to_string(),
            readings: mcheyne::generate(),
        }),
        other => Err(Error::UnknownPlan(other.to_string())),
    }
}
