//! Activity feed: append and cursor-paginated reads.
//!
//! The feed is append-only. Reads degrade to an empty page on gateway
//! failure (the UI shows nothing rather than crashing), and malformed
//! documents are skipped with a warning instead of poisoning the page.

use crate::model::activity::{ActivityDetail, ActivityEvent};
use crate::model::date::PlanDate;
use crate::model::reading::Reading;
use crate::session::User;
use crate::store::{Cursor, DocumentStore, Query, StoreError};

pub const ACTIVITY_COLLECTION: &str = "activity";

/// Feed page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of the activity feed.
///
/// `next_cursor` is present iff the page is full; a short page means the
/// feed is exhausted and the caller must stop paginating.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub items: Vec<ActivityEvent>,
    pub next_cursor: Option<Cursor>,
}

/// Load one feed page, most recent first.
///
/// Gateway failures degrade to an empty page; no error escapes to the
/// caller. Re-trigger the read to retry.
#[must_use]
pub fn page(store: &dyn DocumentStore, page_size: usize, cursor: Option<Cursor>) -> FeedPage {
    let query = Query::collection(ACTIVITY_COLLECTION)
        .limited(page_size)
        .starting_after(cursor);

    let result = match store.query(&query) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("activity feed query failed: {e}");
            return FeedPage::default();
        }
    };

    let items = result
        .docs
        .iter()
        .filter_map(|doc| match ActivityEvent::from_document(&doc.fields) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("skipping activity document {}: {e}", doc.id);
                None
            }
        })
        .collect();

    FeedPage {
        items,
        next_cursor: result.next_cursor,
    }
}

/// Append a completion event for a reading the user just finished.
///
/// # Errors
///
/// Returns [`StoreError`] on backend failure; callers log and continue,
/// since losing one feed entry must not fail the progress write.
pub fn record_completion(
    store: &dyn DocumentStore,
    user: &User,
    reading: &Reading,
) -> Result<(), StoreError> {
    let event = ActivityEvent {
        user_id: user.id.clone(),
        user_name: user.display_name.clone(),
        plan_id: reading.plan_id.clone(),
        date: reading.date,
        timestamp_us: None,
        detail: ActivityDetail::Completion {
            reading_name: Some(reading.name.clone()),
        },
    };
    store.add(ACTIVITY_COLLECTION, event.write_fields())?;
    Ok(())
}

/// Append a comment event mirroring a posted comment.
///
/// # Errors
///
/// Returns [`StoreError`] on backend failure.
pub fn record_comment_activity(
    store: &dyn DocumentStore,
    user: &User,
    plan_id: &str,
    date: PlanDate,
    body: &str,
) -> Result<(), StoreError> {
    let event = ActivityEvent {
        user_id: user.id.clone(),
        user_name: user.display_name.clone(),
        plan_id: plan_id.to_string(),
        date,
        timestamp_us: None,
        detail: ActivityDetail::Comment {
            body: Some(body.to_string()),
        },
    };
    store.add(ACTIVITY_COLLECTION, event.write_fields())?;
    Ok(())
}
