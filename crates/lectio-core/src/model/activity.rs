//! Activity feed event model.
//!
//! Activity documents are append-only and immutable once written. The wire
//! shape is a flat document with a `type` discriminant external to the
//! payload fields, so deserialization dispatches on the parsed kind.

use crate::model::date::PlanDate;
use crate::store::{Document, FieldValue, Fields};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Document field names used by activity records.
///
/// These are the persisted key names; renaming them breaks existing data.
pub mod fields {
    pub const TYPE: &str = "type";
    pub const USER_ID: &str = "userId";
    pub const USER_NAME: &str = "userName";
    pub const PLAN_ID: &str = "planId";
    pub const DATE: &str = "date";
    pub const TIMESTAMP: &str = "timestamp";
    pub const READING_NAME: &str = "readingName";
    pub const COMMENT: &str = "comment";
}

/// The two kinds of activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Completion,
    Comment,
}

impl ActivityKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an activity kind from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivityKind {
    pub got: String,
}

impl fmt::Display for UnknownActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity kind: '{}'", self.got)
    }
}

impl std::error::Error for UnknownActivityKind {}

impl FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "comment" => Ok(Self::Comment),
            _ => Err(UnknownActivityKind { got: s.to_string() }),
        }
    }
}

/// Kind-specific payload of an activity event.
///
/// Both payload fields are optional on the wire; older records may lack
/// them and the view layer substitutes placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityDetail {
    Completion { reading_name: Option<String> },
    Comment { body: Option<String> },
}

/// One event in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub user_id: String,
    pub user_name: String,
    pub plan_id: String,
    pub date: PlanDate,
    /// Store-resolved timestamp in microseconds; `None` when the document
    /// predates timestamp resolution (rendered as "just now").
    pub timestamp_us: Option<i64>,
    pub detail: ActivityDetail,
}

/// Error returned when an activity document does not match the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityParseError {
    pub reason: String,
}

impl fmt::Display for ActivityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed activity document: {}", self.reason)
    }
}

impl std::error::Error for ActivityParseError {}

fn required_str(doc: &Document, key: &str) -> Result<String, ActivityParseError> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ActivityParseError {
            reason: format!("missing or non-string field '{key}'"),
        })
}

fn optional_str(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

impl ActivityEvent {
    #[must_use]
    pub const fn kind(&self) -> ActivityKind {
        match self.detail {
            ActivityDetail::Completion { .. } => ActivityKind::Completion,
            ActivityDetail::Comment { .. } => ActivityKind::Comment,
        }
    }

    /// Parse a stored document, dispatching on the `type` discriminant.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityParseError`] when the discriminant is unknown or a
    /// required field is missing. Callers in the feed path skip (and log)
    /// malformed documents rather than failing the whole page.
    pub fn from_document(doc: &Document) -> Result<Self, ActivityParseError> {
        let kind: ActivityKind = required_str(doc, fields::TYPE)?
            .parse()
            .map_err(|e: UnknownActivityKind| ActivityParseError {
                reason: e.to_string(),
            })?;

        let date: PlanDate = required_str(doc, fields::DATE)?
            .parse()
            .map_err(|e| ActivityParseError {
                reason: format!("{e}"),
            })?;

        let detail = match kind {
            ActivityKind::Completion => ActivityDetail::Completion {
                reading_name: optional_str(doc, fields::READING_NAME),
            },
            ActivityKind::Comment => ActivityDetail::Comment {
                body: optional_str(doc, fields::COMMENT),
            },
        };

        Ok(Self {
            user_id: required_str(doc, fields::USER_ID)?,
            user_name: required_str(doc, fields::USER_NAME)?,
            plan_id: required_str(doc, fields::PLAN_ID)?,
            date,
            timestamp_us: doc.get(fields::TIMESTAMP).and_then(Value::as_i64),
            detail,
        })
    }

    /// Build the write-side fields for appending this event, with the
    /// timestamp left as a server-resolved sentinel.
    #[must_use]
    pub fn write_fields(&self) -> Fields {
        let mut out = Fields::new();
        out.insert(
            fields::TYPE.to_string(),
            FieldValue::from(self.kind().as_str()),
        );
        out.insert(
            fields::USER_ID.to_string(),
            FieldValue::from(self.user_id.as_str()),
        );
        out.insert(
            fields::USER_NAME.to_string(),
            FieldValue::from(self.user_name.as_str()),
        );
        out.insert(
            fields::PLAN_ID.to_string(),
            FieldValue::from(self.plan_id.as_str()),
        );
        out.insert(
            fields::DATE.to_string(),
            FieldValue::from(self.date.to_string()),
        );
        out.insert(fields::TIMESTAMP.to_string(), FieldValue::ServerTimestamp);

        match &self.detail {
            ActivityDetail::Completion {
                reading_name: Some(name),
            } => {
                out.insert(fields::READING_NAME.to_string(), FieldValue::from(name.as_str()));
            }
            ActivityDetail::Comment { body: Some(body) } => {
                out.insert(fields::COMMENT.to_string(), FieldValue::from(body.as_str()));
            }
            ActivityDetail::Completion { reading_name: None }
            | ActivityDetail::Comment { body: None } => {}
        }

        out
    }
}

impl Serialize for ActivityEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(fields::TYPE, self.kind().as_str())?;
        map.serialize_entry(fields::USER_ID, &self.user_id)?;
        map.serialize_entry(fields::USER_NAME, &self.user_name)?;
        map.serialize_entry(fields::PLAN_ID, &self.plan_id)?;
        map.serialize_entry(fields::DATE, &self.date)?;
        map.serialize_entry(fields::TIMESTAMP, &self.timestamp_us)?;
        match &self.detail {
            ActivityDetail::Completion { reading_name } => {
                map.serialize_entry(fields::READING_NAME, reading_name)?;
            }
            ActivityDetail::Comment { body } => {
                map.serialize_entry(fields::COMMENT, body)?;
            }
        }
        map.end()
    }
}
