use crate::model::date::PlanDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stable identity of one scheduled reading: `"<plan>-<day>-<column>"`.
///
/// The id is derivable again from `(plan id, day-of-year, column)` alone, so
/// progress-record keys written against one generation of a plan keep
/// resolving after the plan is regenerated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingId(String);

impl ReadingId {
    #[must_use]
    pub fn new(plan_id: &str, day_of_year: u16, column: u8) -> Self {
        Self(format!("{plan_id}-{day_of_year}-{column}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(plan id, day-of-year, column)`.
    ///
    /// Returns `None` when the id was not produced by [`ReadingId::new`].
    #[must_use]
    pub fn parts(&self) -> Option<(&str, u16, u8)> {
        let (rest, column) = self.0.rsplit_once('-')?;
        let (plan_id, day) = rest.rsplit_once('-')?;
        if plan_id.is_empty() {
            return None;
        }
        Some((plan_id, day.parse().ok()?, column.parse().ok()?))
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing a reading id from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReadingIdError {
    pub got: String,
}

impl fmt::Display for ParseReadingIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid reading id: '{}' (expected <plan>-<day>-<column>)",
            self.got
        )
    }
}

impl std::error::Error for ParseReadingIdError {}

impl FromStr for ReadingId {
    type Err = ParseReadingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = Self(s.trim().to_string());
        if candidate.parts().is_none() {
            return Err(ParseReadingIdError { got: s.to_string() });
        }
        Ok(candidate)
    }
}

/// One scheduled passage assignment within a plan.
///
/// Immutable once generated; identity is [`Reading::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub id: ReadingId,
    pub date: PlanDate,
    /// Passage reference for display, e.g. `"Genesis 5"`.
    pub name: String,
    pub plan_id: String,
}
