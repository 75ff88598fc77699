//! Comment threads attached to a plan day.
//!
//! Posting validates before any write reaches the gateway: an absent user
//! or an empty body rejects the comment outright. A successful post also
//! appends a mirror event to the activity feed; losing that mirror is
//! logged, never fatal.

use crate::error::Error;
use crate::feed;
use crate::model::activity::fields;
use crate::model::date::PlanDate;
use crate::session::User;
use crate::store::{Document, DocumentStore, FieldValue, Fields, Filter, Query};
use serde::Serialize;
use serde_json::Value;

pub const COMMENTS_COLLECTION: &str = "comments";

/// One comment in a day's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub plan_id: String,
    pub date: PlanDate,
    #[serde(rename = "comment")]
    pub body: String,
    #[serde(rename = "timestamp")]
    pub timestamp_us: Option<i64>,
}

impl Comment {
    fn from_document(id: &str, doc: &Document) -> Option<Self> {
        let text = |key: &str| doc.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            id: id.to_string(),
            user_id: text(fields::USER_ID)?,
            user_name: text(fields::USER_NAME)?,
            plan_id: text(fields::PLAN_ID)?,
            date: text(fields::DATE)?.parse().ok()?,
            body: text(fields::COMMENT)?,
            timestamp_us: doc.get(fields::TIMESTAMP).and_then(Value::as_i64),
        })
    }
}

/// Post a comment on a plan day.
///
/// # Errors
///
/// Returns [`Error::NotSignedIn`] without a user, [`Error::EmptyComment`]
/// for an empty or whitespace-only body (checked before any write), and a
/// store error if the comment write itself fails. The paired activity
/// event is best-effort.
pub fn post(
    store: &dyn DocumentStore,
    user: Option<&User>,
    plan_id: &str,
    date: PlanDate,
    body: &str,
) -> Result<String, Error> {
    let user = user.ok_or(Error::NotSignedIn)?;
    let body = body.trim();
    if body.is_empty() {
        return Err(Error::EmptyComment);
    }

    let mut doc = Fields::new();
    doc.insert(fields::USER_ID.to_string(), FieldValue::from(user.id.as_str()));
    doc.insert(
        fields::USER_NAME.to_string(),
        FieldValue::from(user.display_name.as_str()),
    );
    doc.insert(fields::PLAN_ID.to_string(), FieldValue::from(plan_id));
    doc.insert(fields::DATE.to_string(), FieldValue::from(date.to_string()));
    doc.insert(fields::COMMENT.to_string(), FieldValue::from(body));
    doc.insert(fields::TIMESTAMP.to_string(), FieldValue::ServerTimestamp);

    let id = store.add(COMMENTS_COLLECTION, doc)?;
    tracing::debug!("comment {id} saved for {plan_id} {date}");

    if let Err(e) = feed::record_comment_activity(store, user, plan_id, date, body) {
        tracing::warn!("comment {id} saved but activity mirror failed: {e}");
    }

    Ok(id)
}

/// Load a day's comment thread, newest first.
///
/// Gateway failures degrade to an empty thread; malformed documents are
/// skipped with a warning.
#[must_use]
pub fn thread(store: &dyn DocumentStore, plan_id: &str, date: PlanDate) -> Vec<Comment> {
    let query = Query::collection(COMMENTS_COLLECTION)
        .filtered(Filter::equals(fields::PLAN_ID, plan_id))
        .filtered(Filter::equals(fields::DATE, date.to_string()));

    let result = match store.query(&query) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("comment query failed for {plan_id} {date}: {e}");
            return Vec::new();
        }
    };

    result
        .docs
        .iter()
        .filter_map(|doc| {
            let comment = Comment::from_document(&doc.id, &doc.fields);
            if comment.is_none() {
                tracing::warn!("skipping malformed comment document {}", doc.id);
            }
            comment
        })
        .collect()
}
