//! Per-user completion state and derived progress statistics.
//!
//! A progress record is one document per user: field per reading id, JSON
//! boolean value. Only values that are exactly `true` count — numbers,
//! strings, and nulls left behind by older clients never inflate the
//! completion count.

use crate::error::Error;
use crate::feed;
use crate::model::reading::{Reading, ReadingId};
use crate::plan::Plan;
use crate::session::User;
use crate::store::{Document, DocumentStore, FieldValue, Fields, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const PROGRESS_COLLECTION: &str = "progress";

/// A user's per-reading completion map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    fields: Document,
}

impl ProgressRecord {
    #[must_use]
    pub const fn from_document(fields: Document) -> Self {
        Self { fields }
    }

    /// Strict completion check: only JSON `true` counts.
    #[must_use]
    pub fn is_complete(&self, id: &ReadingId) -> bool {
        matches!(self.fields.get(id.as_str()), Some(Value::Bool(true)))
    }

    /// Completed readings restricted to one plan's ids.
    #[must_use]
    pub fn completed_in(&self, plan: &Plan) -> usize {
        plan.readings()
            .iter()
            .filter(|reading| self.is_complete(&reading.id))
            .count()
    }
}

/// Lifecycle of a user's engagement with a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    NotStarted,
    InProgress,
    Completed,
    Error,
}

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived progress statistics. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub status: Status,
}

/// Whole-percent completion, rounded half-up like the progress bar shows.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Compute a summary from an in-hand record. Read-only, no side effects.
#[must_use]
pub fn summarize(record: &ProgressRecord, plan: &Plan) -> ProgressSummary {
    let completed = record.completed_in(plan);
    let total = plan.total();
    let percent = percent(completed, total);

    let status = if completed == 0 {
        Status::NotStarted
    } else if percent == 100 {
        Status::Completed
    } else {
        Status::InProgress
    };

    ProgressSummary {
        completed,
        total,
        percent,
        status,
    }
}

/// The summary reported when the record cannot be loaded at all.
///
/// Callers distinguish "failed to load" from "never started" only through
/// this status, never through a propagated error.
#[must_use]
pub fn error_summary(plan: &Plan) -> ProgressSummary {
    ProgressSummary {
        completed: 0,
        total: plan.total(),
        percent: 0,
        status: Status::Error,
    }
}

/// Load a user's record. An absent document is an empty record.
///
/// # Errors
///
/// Returns [`StoreError`] on backend failure.
pub fn load_record(store: &dyn DocumentStore, user_id: &str) -> Result<ProgressRecord, StoreError> {
    Ok(store
        .get(PROGRESS_COLLECTION, user_id)?
        .map(ProgressRecord::from_document)
        .unwrap_or_default())
}

/// Load and summarize in one step, degrading transport failures to
/// [`Status::Error`]. No user means no record: not-started.
#[must_use]
pub fn load_summary(store: &dyn DocumentStore, user_id: Option<&str>, plan: &Plan) -> ProgressSummary {
    let Some(user_id) = user_id else {
        return summarize(&ProgressRecord::default(), plan);
    };

    match load_record(store, user_id) {
        Ok(record) => summarize(&record, plan),
        Err(e) => {
            tracing::warn!("progress load failed for {user_id}: {e}");
            error_summary(plan)
        }
    }
}

/// Result of a checkbox toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nobody signed in: the toggle reverts and nothing reaches the store.
    SignedOut,
    /// Saved; carries the freshly recomputed summary.
    Saved(ProgressSummary),
}

/// Toggle one reading's completion for the current user.
///
/// Completing a reading also appends a completion event to the activity
/// feed; losing that event is logged but never fails the toggle.
///
/// # Errors
///
/// Returns a store error when the progress write itself fails, so the UI
/// can surface it to the user.
pub fn toggle_reading(
    store: &dyn DocumentStore,
    user: Option<&User>,
    plan: &Plan,
    reading: &Reading,
    completed: bool,
) -> Result<ToggleOutcome, Error> {
    let Some(user) = user else {
        return Ok(ToggleOutcome::SignedOut);
    };

    let mut fields = Fields::new();
    fields.insert(reading.id.to_string(), FieldValue::from(completed));
    store.set_merge(PROGRESS_COLLECTION, &user.id, fields)?;

    if completed
        && let Err(e) = feed::record_completion(store, user, reading)
    {
        tracing::warn!("progress saved but completion event failed: {e}");
    }

    Ok(ToggleOutcome::Saved(load_summary(
        store,
        Some(&user.id),
        plan,
    )))
}

#[cfg(test)]
mod tests {
    use super::{
        PROGRESS_COLLECTION, ProgressRecord, Status, ToggleOutcome, load_summary, percent,
        summarize, toggle_reading,
    };
    use crate::feed::ACTIVITY_COLLECTION;
    use crate::plan;
    use crate::session::User;
    use crate::store::{Document, DocumentStore, MemoryStore, Query};
    use serde_json::{Value, json};

    fn jane() -> User {
        User {
            id: "u-jane".to_string(),
            display_name: "Jane".to_string(),
        }
    }

    fn record(entries: &[(&str, Value)]) -> ProgressRecord {
        let doc: Document = entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect();
        ProgressRecord::from_document(doc)
    }

    #[test]
    fn empty_record_is_not_started() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let summary = summarize(&ProgressRecord::default(), &plan);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.total, 1460);
        assert_eq!(summary.percent, 0);
        assert_eq!(summary.status, Status::NotStarted);
    }

    #[test]
    fn only_strict_true_counts() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let record = record(&[
            ("mcheyne-1-0", json!(true)),
            ("mcheyne-1-1", json!(false)),
            ("mcheyne-1-2", json!(1)),
            ("mcheyne-1-3", json!("true")),
            ("mcheyne-2-0", Value::Null),
            ("someone-elses-key", json!(true)),
        ]);

        let summary = summarize(&record, &plan);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.percent, 0, "1/1460 rounds down to zero");
        assert_eq!(summary.status, Status::InProgress);
    }

    #[test]
    fn all_complete_is_one_hundred_percent() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let entries: Vec<(String, Value)> = plan
            .readings()
            .iter()
            .map(|r| (r.id.to_string(), json!(true)))
            .collect();
        let doc: Document = entries.into_iter().collect();

        let summary = summarize(&ProgressRecord::from_document(doc), &plan);
        assert_eq!(summary.completed, summary.total);
        assert_eq!(summary.percent, 100);
        assert_eq!(summary.status, Status::Completed);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 200), 1); // 0.5% -> 1
        assert_eq!(percent(1, 201), 0); // 0.497% -> 0
        assert_eq!(percent(1, 1460), 0);
        assert_eq!(percent(730, 1460), 50);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Status::NotStarted).expect("serialize"),
            "\"not-started\""
        );
        assert_eq!(
            serde_json::to_string(&Status::InProgress).expect("serialize"),
            "\"in-progress\""
        );
    }

    #[test]
    fn missing_user_reads_as_not_started() {
        let store = MemoryStore::new();
        let plan = plan::generate("mcheyne").expect("plan generates");
        let summary = load_summary(&store, None, &plan);
        assert_eq!(summary.status, Status::NotStarted);
    }

    #[test]
    fn signed_out_toggle_never_touches_the_store() {
        let store = MemoryStore::new();
        let plan = plan::generate("mcheyne").expect("plan generates");
        let reading = &plan.readings()[0];

        let outcome =
            toggle_reading(&store, None, &plan, reading, true).expect("toggle returns");
        assert_eq!(outcome, ToggleOutcome::SignedOut);

        assert!(
            store
                .get(PROGRESS_COLLECTION, "u-jane")
                .expect("get")
                .is_none()
        );
        assert!(
            store
                .query(&Query::collection(ACTIVITY_COLLECTION))
                .expect("query")
                .docs
                .is_empty()
        );
    }

    #[test]
    fn completing_a_reading_saves_and_records_activity() {
        let store = MemoryStore::new();
        let plan = plan::generate("mcheyne").expect("plan generates");
        let reading = &plan.readings()[0];

        let outcome = toggle_reading(&store, Some(&jane()), &plan, reading, true)
            .expect("toggle succeeds");
        let ToggleOutcome::Saved(summary) = outcome else {
            panic!("expected a saved outcome");
        };
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.status, Status::InProgress);

        let activity = store
            .query(&Query::collection(ACTIVITY_COLLECTION))
            .expect("query");
        assert_eq!(activity.docs.len(), 1);
        assert_eq!(
            activity.docs[0].fields.get("readingName"),
            Some(&json!("Genesis 1"))
        );
    }

    #[test]
    fn unchecking_saves_but_records_no_activity() {
        let store = MemoryStore::new();
        let plan = plan::generate("mcheyne").expect("plan generates");
        let reading = &plan.readings()[0];

        toggle_reading(&store, Some(&jane()), &plan, reading, true).expect("check");
        let outcome = toggle_reading(&store, Some(&jane()), &plan, reading, false)
            .expect("uncheck");
        let ToggleOutcome::Saved(summary) = outcome else {
            panic!("expected a saved outcome");
        };
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.status, Status::NotStarted);

        let activity = store
            .query(&Query::collection(ACTIVITY_COLLECTION))
            .expect("query");
        assert_eq!(activity.docs.len(), 1, "only the original completion");
    }
}
