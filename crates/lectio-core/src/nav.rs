//! Day navigation over a plan's calendar.
//!
//! Dates order chronologically (month, then day) — never as strings,
//! where "10/1" would sort before "2/1". Navigation moves exactly one
//! position and refuses to step past either end; the buttons disable
//! instead of wrapping.

use crate::model::date::PlanDate;
use crate::plan::Plan;
use crate::progress::ProgressRecord;

/// The distinct dates of a plan in chronological order.
#[must_use]
pub fn distinct_dates(plan: &Plan) -> Vec<PlanDate> {
    let mut dates: Vec<PlanDate> = plan.readings().iter().map(|r| r.date).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Position of `date` in the ordered date list.
#[must_use]
pub fn current_index(dates: &[PlanDate], date: PlanDate) -> Option<usize> {
    dates.iter().position(|candidate| *candidate == date)
}

/// The first date whose readings are not all strictly complete.
///
/// When every date is complete this wraps to the plan's first date:
/// finishing a plan restarts browsing at day one rather than reporting
/// "plan finished". Returns `None` only for an empty plan, which callers
/// must rule out.
#[must_use]
pub fn first_incomplete_date(record: &ProgressRecord, plan: &Plan) -> Option<PlanDate> {
    let dates = distinct_dates(plan);
    for date in &dates {
        let complete = plan
            .readings_on(*date)
            .all(|reading| record.is_complete(&reading.id));
        if !complete {
            return Some(*date);
        }
    }
    dates.first().copied()
}

/// Cursor over a plan's dates with bounded prev/next movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNavigator {
    dates: Vec<PlanDate>,
    index: usize,
}

impl DayNavigator {
    /// Position a navigator on `date`. `None` when the date is not part of
    /// the plan's calendar.
    #[must_use]
    pub fn new(plan: &Plan, date: PlanDate) -> Option<Self> {
        let dates = distinct_dates(plan);
        let index = current_index(&dates, date)?;
        Some(Self { dates, index })
    }

    #[must_use]
    pub fn current(&self) -> PlanDate {
        self.dates[self.index]
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.dates.len()
    }

    /// The date one step back, without moving.
    #[must_use]
    pub fn peek_previous(&self) -> Option<PlanDate> {
        self.has_previous().then(|| self.dates[self.index - 1])
    }

    /// The date one step forward, without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<PlanDate> {
        self.has_next().then(|| self.dates[self.index + 1])
    }

    /// Step back one date. At the first date this is a no-op returning
    /// `None`.
    pub fn previous(&mut self) -> Option<PlanDate> {
        if !self.has_previous() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward one date. At the last date this is a no-op returning
    /// `None`.
    pub fn next(&mut self) -> Option<PlanDate> {
        if !self.has_next() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

/// Stale-render guard for a browsing session.
///
/// Loads race navigation: a response for a date the user has already left
/// must not overwrite the newer page. The session records the date being
/// displayed; a result is applied only while its date is still current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySession {
    current: Option<PlanDate>,
}

impl DaySession {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Record that the session is now displaying `date`.
    pub fn navigate_to(&mut self, date: PlanDate) {
        self.current = Some(date);
    }

    /// Whether a result loaded for `date` may still be rendered.
    #[must_use]
    pub fn accepts(&self, date: PlanDate) -> bool {
        self.current == Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::{DayNavigator, DaySession, current_index, distinct_dates, first_incomplete_date};
    use crate::model::date::PlanDate;
    use crate::plan;
    use crate::progress::ProgressRecord;
    use crate::store::Document;
    use serde_json::json;
    use std::str::FromStr;

    fn date(raw: &str) -> PlanDate {
        PlanDate::from_str(raw).expect("valid date")
    }

    #[test]
    fn dates_sort_chronologically_not_lexicographically() {
        let mut sample = vec![date("2/1"), date("10/1"), date("1/15")];
        sample.sort_unstable();
        let rendered: Vec<String> = sample.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1/15", "2/1", "10/1"]);
    }

    #[test]
    fn plan_dates_are_the_full_ordered_year() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let dates = distinct_dates(&plan);

        assert_eq!(dates.len(), 365);
        assert_eq!(dates[0], date("1/1"));
        assert_eq!(dates[364], date("12/31"));
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn index_lookup_finds_dates() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let dates = distinct_dates(&plan);
        assert_eq!(current_index(&dates, date("1/1")), Some(0));
        assert_eq!(current_index(&dates, date("3/1")), Some(59));
        assert_eq!(current_index(&[], date("1/1")), None);
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let plan = plan::generate("mcheyne").expect("plan generates");

        let mut nav = DayNavigator::new(&plan, date("1/1")).expect("on calendar");
        assert!(!nav.has_previous());
        assert!(nav.has_next());
        assert_eq!(nav.previous(), None, "no wrap before day one");
        assert_eq!(nav.current(), date("1/1"));
        assert_eq!(nav.next(), Some(date("1/2")));

        let mut nav = DayNavigator::new(&plan, date("12/31")).expect("on calendar");
        assert!(!nav.has_next());
        assert_eq!(nav.next(), None, "no wrap past the last day");
        assert_eq!(nav.peek_previous(), Some(date("12/30")));
        assert_eq!(nav.previous(), Some(date("12/30")));
    }

    #[test]
    fn off_calendar_dates_have_no_navigator() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        assert!(DayNavigator::new(&plan, date("2/28")).is_some());
        // 2/29 cannot even parse, so a navigator can never sit on it.
        assert!(PlanDate::from_str("2/29").is_err());
    }

    fn record_with_all_but(plan: &crate::plan::Plan, skip: PlanDate) -> ProgressRecord {
        let doc: Document = plan
            .readings()
            .iter()
            .filter(|r| r.date != skip)
            .map(|r| (r.id.to_string(), json!(true)))
            .collect();
        ProgressRecord::from_document(doc)
    }

    #[test]
    fn first_incomplete_date_finds_the_gap() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let record = record_with_all_but(&plan, date("3/5"));
        assert_eq!(first_incomplete_date(&record, &plan), Some(date("3/5")));
    }

    #[test]
    fn a_partially_complete_day_is_incomplete() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let mut doc = Document::new();
        // Three of the four readings on 1/1.
        for reading in plan.readings().iter().take(3) {
            doc.insert(reading.id.to_string(), json!(true));
        }
        let record = ProgressRecord::from_document(doc);
        assert_eq!(first_incomplete_date(&record, &plan), Some(date("1/1")));
    }

    #[test]
    fn finished_plan_wraps_to_the_first_date() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        let doc: Document = plan
            .readings()
            .iter()
            .map(|r| (r.id.to_string(), json!(true)))
            .collect();
        let record = ProgressRecord::from_document(doc);
        assert_eq!(first_incomplete_date(&record, &plan), Some(date("1/1")));
    }

    #[test]
    fn fresh_record_starts_at_day_one() {
        let plan = plan::generate("mcheyne").expect("plan generates");
        assert_eq!(
            first_incomplete_date(&ProgressRecord::default(), &plan),
            Some(date("1/1"))
        );
    }

    #[test]
    fn stale_loads_are_rejected_by_the_session() {
        let mut session = DaySession::new();
        assert!(!session.accepts(date("3/5")), "nothing displayed yet");

        session.navigate_to(date("3/5"));
        assert!(session.accepts(date("3/5")));

        // User moves on before the 3/5 load lands.
        session.navigate_to(date("3/6"));
        assert!(!session.accepts(date("3/5")), "stale result is dropped");
        assert!(session.accepts(date("3/6")));
    }
}
