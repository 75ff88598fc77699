use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of days in the fixed plan calendar.
///
/// Reading plans run on a non-leap year: Feb 29 never appears, so day 60
/// is always 3/1 and persisted reading ids stay stable across years.
pub const DAYS_IN_YEAR: u16 = 365;

const MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar date within the fixed plan year, rendered as `"M/D"`.
///
/// Ordering is chronological (month, then day), never lexicographic:
/// `2/1 < 10/1` even though `"10/1" < "2/1"` as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanDate {
    month: u8,
    day: u8,
}

impl PlanDate {
    /// Construct a date, validating against the fixed non-leap calendar.
    ///
    /// Returns `None` for out-of-range months or days (including 2/29).
    #[must_use]
    pub fn new(month: u8, day: u8) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let max_day = MONTH_LENGTHS[usize::from(month) - 1];
        if day == 0 || day > max_day {
            return None;
        }
        Some(Self { month, day })
    }

    /// Map a 1-based day-of-year (1..=365) to its date.
    #[must_use]
    pub fn from_day_of_year(day_of_year: u16) -> Option<Self> {
        if day_of_year == 0 || day_of_year > DAYS_IN_YEAR {
            return None;
        }
        let mut remaining = day_of_year;
        for (idx, len) in MONTH_LENGTHS.iter().enumerate() {
            if remaining <= u16::from(*len) {
                #[allow(clippy::cast_possible_truncation)]
                return Self::new(idx as u8 + 1, remaining as u8);
            }
            remaining -= u16::from(*len);
        }
        None
    }

    /// The 1-based day-of-year of this date (3/1 is day 60).
    #[must_use]
    pub fn day_of_year(self) -> u16 {
        let prior: u16 = MONTH_LENGTHS[..usize::from(self.month) - 1]
            .iter()
            .map(|len| u16::from(*len))
            .sum();
        prior + u16::from(self.day)
    }

    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// English month name, e.g. `"March"` for 3/x.
    #[must_use]
    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.month) - 1]
    }

    /// Long display heading, e.g. `"March 5"`.
    #[must_use]
    pub fn long_heading(self) -> String {
        format!("{} {}", self.month_name(), self.day)
    }
}

impl fmt::Display for PlanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

/// Error returned when parsing a `"M/D"` date from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateError {
    pub got: String,
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan date: '{}' (expected M/D)", self.got)
    }
}

impl std::error::Error for ParseDateError {}

impl FromStr for PlanDate {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateError { got: s.to_string() };
        let (month, day) = s.trim().split_once('/').ok_or_else(err)?;
        let month: u8 = month.parse().map_err(|_| err())?;
        let day: u8 = day.parse().map_err(|_| err())?;
        Self::new(month, day).ok_or_else(err)
    }
}

impl Serialize for PlanDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PlanDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
