//! Pure view models.
//!
//! Everything here returns data; presentation layers (the CLI today)
//! render it however they like, which keeps the plan/progress/feed logic
//! testable without a terminal attached.

use crate::model::activity::{ActivityDetail, ActivityEvent};
use crate::model::date::PlanDate;
use crate::nav::DayNavigator;
use crate::plan::Plan;
use crate::progress::ProgressRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Comment previews in the feed cut off after this many characters.
pub const COMMENT_PREVIEW_CHARS: usize = 100;

const PASSAGE_URL_BASE: &str = "https://www.esv.org/";

/// One reading row on a day page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingLine {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub passage_url: String,
}

/// Navigation affordances for a day page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub has_previous: bool,
    pub has_next: bool,
    pub previous: Option<PlanDate>,
    pub next: Option<PlanDate>,
}

/// A fully assembled day page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub plan_id: String,
    pub date: PlanDate,
    pub day_of_year: u16,
    /// Long date heading, e.g. `"March 5"`.
    pub heading: String,
    pub readings: Vec<ReadingLine>,
    pub nav: NavState,
}

/// Assemble the day page for `date`.
///
/// Returns `None` when the date is not on the plan's calendar; callers
/// route that to an error page rather than rendering an empty day.
#[must_use]
pub fn day_view(plan: &Plan, date: PlanDate, record: &ProgressRecord) -> Option<DayView> {
    let navigator = DayNavigator::new(plan, date)?;

    let readings = plan
        .readings_on(date)
        .map(|reading| ReadingLine {
            id: reading.id.to_string(),
            name: reading.name.clone(),
            completed: record.is_complete(&reading.id),
            passage_url: passage_url(&reading.name),
        })
        .collect();

    Some(DayView {
        plan_id: plan.id().to_string(),
        date,
        day_of_year: date.day_of_year(),
        heading: date.long_heading(),
        readings,
        nav: NavState {
            has_previous: navigator.has_previous(),
            has_next: navigator.has_next(),
            previous: navigator.peek_previous(),
            next: navigator.peek_next(),
        },
    })
}

/// External reader link for a passage reference.
#[must_use]
pub fn passage_url(name: &str) -> String {
    let mut url = String::with_capacity(PASSAGE_URL_BASE.len() + name.len());
    url.push_str(PASSAGE_URL_BASE);
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                url.push(char::from(byte));
            }
            other => {
                url.push_str(&format!("%{other:02X}"));
            }
        }
    }
    url
}

/// Truncate a comment body for feed previews, appending an ellipsis
/// marker when the body exceeds [`COMMENT_PREVIEW_CHARS`].
#[must_use]
pub fn truncate_comment(body: &str) -> String {
    if body.chars().count() <= COMMENT_PREVIEW_CHARS {
        return body.to_string();
    }
    let mut preview: String = body.chars().take(COMMENT_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

/// Human time for a feed entry; documents without a resolved timestamp
/// read as "just now".
#[must_use]
pub fn format_event_time(timestamp_us: Option<i64>) -> String {
    timestamp_us.map_or_else(
        || "just now".to_string(),
        |us| {
            DateTime::<Utc>::from_timestamp_micros(us)
                .map_or_else(|| us.to_string(), |ts| ts.to_rfc3339())
        },
    )
}

/// One rendered feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLine {
    pub text: String,
    /// Truncated comment body, present for comment events with a body.
    pub preview: Option<String>,
    pub time: String,
    /// Link target back to the day's page.
    pub plan_id: String,
    pub date: PlanDate,
}

/// Render one activity event for the feed.
#[must_use]
pub fn feed_line(event: &ActivityEvent) -> FeedLine {
    let (text, preview) = match &event.detail {
        ActivityDetail::Completion { reading_name } => (
            format!(
                "{} read {}",
                event.user_name,
                reading_name.as_deref().unwrap_or("a reading")
            ),
            None,
        ),
        ActivityDetail::Comment { body } => (
            format!("{} commented on {}'s readings", event.user_name, event.date),
            body.as_deref().map(truncate_comment),
        ),
    };

    FeedLine {
        text,
        preview,
        time: format_event_time(event.timestamp_us),
        plan_id: event.plan_id.clone(),
        date: event.date,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        COMMENT_PREVIEW_CHARS, day_view, feed_line, format_event_time, passage_url,
        truncate_comment,
    };
    use crate::model::activity::{ActivityDetail, ActivityEvent};
    use crate::model::date::PlanDate;
    use crate::plan;
    use crate::progress::ProgressRecord;
    use crate::store::Document;
    use serde_json::json;

    fn date(raw: &str) -> PlanDate {
        raw.parse().expect("valid date")
    }

    #[test]
    fn day_view_carries_heading_and_check_state() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let mut doc = Document::new();
        doc.insert("mcheyne-64-0".to_string(), json!(true));
        let record = ProgressRecord::from_document(doc);

        let view = day_view(&plan, date("3/5"), &record).expect("on calendar");
        assert_eq!(view.heading, "March 5");
        assert_eq!(view.day_of_year, 64);
        assert_eq!(view.readings.len(), 4);
        assert!(view.readings[0].completed);
        assert!(!view.readings[1].completed);
        assert!(view.nav.has_previous);
        assert!(view.nav.has_next);
        assert_eq!(view.nav.previous, Some(date("3/4")));
        assert_eq!(view.nav.next, Some(date("3/6")));
    }

    #[test]
    fn day_view_disables_navigation_at_the_edges() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let record = ProgressRecord::default();

        let first = day_view(&plan, date("1/1"), &record).expect("on calendar");
        assert!(!first.nav.has_previous);
        assert_eq!(first.nav.previous, None);

        let last = day_view(&plan, date("12/31"), &record).expect("on calendar");
        assert!(!last.nav.has_next);
        assert_eq!(last.nav.next, None);
    }

    #[test]
    fn passage_urls_are_percent_encoded() {
        assert_eq!(
            passage_url("Genesis 5"),
            "https://www.esv.org/Genesis%205"
        );
        assert_eq!(
            passage_url("Song of Solomon 3"),
            "https://www.esv.org/Song%20of%20Solomon%203"
        );
    }

    #[test]
    fn short_comments_pass_through_untruncated() {
        let body = "a".repeat(COMMENT_PREVIEW_CHARS);
        assert_eq!(truncate_comment(&body), body);
    }

    #[test]
    fn long_comments_get_an_ellipsis() {
        let body = "a".repeat(COMMENT_PREVIEW_CHARS + 1);
        let preview = truncate_comment(&body);
        assert_eq!(preview.chars().count(), COMMENT_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let body = "é".repeat(150);
        let preview = truncate_comment(&body);
        assert_eq!(preview.chars().count(), COMMENT_PREVIEW_CHARS + 3);
        assert!(preview.starts_with('é'));
    }

    #[test]
    fn missing_timestamps_read_as_just_now() {
        assert_eq!(format_event_time(None), "just now");
        assert!(format_event_time(Some(1_700_000_000_000_000)).starts_with("2023-"));
    }

    fn comment_event(body: &str) -> ActivityEvent {
        ActivityEvent {
            user_id: "u1".to_string(),
            user_name: "Jane".to_string(),
            plan_id: "mcheyne".to_string(),
            date: date("3/5"),
            timestamp_us: None,
            detail: ActivityDetail::Comment {
                body: Some(body.to_string()),
            },
        }
    }

    #[test]
    fn feed_lines_describe_both_event_kinds() {
        let comment = feed_line(&comment_event("hello"));
        assert_eq!(comment.text, "Jane commented on 3/5's readings");
        assert_eq!(comment.preview.as_deref(), Some("hello"));
        assert_eq!(comment.time, "just now");
        assert_eq!(comment.date, date("3/5"));

        let completion = feed_line(&ActivityEvent {
            detail: ActivityDetail::Completion { reading_name: None },
            ..comment_event("")
        });
        assert_eq!(completion.text, "Jane read a reading");
        assert_eq!(completion.preview, None);
    }

    #[test]
    fn feed_preview_is_truncated() {
        let long = "x".repeat(140);
        let line = feed_line(&comment_event(&long));
        let preview = line.preview.expect("comment has a preview");
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), COMMENT_PREVIEW_CHARS + 3);
    }
}
