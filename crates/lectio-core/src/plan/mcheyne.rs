//! M'Cheyne reading scheme.
//!
//! Four parallel tracks, one chapter per track per day across the fixed
//! 365-day plan year: Old Testament history read once, the New Testament,
//! the Psalms and wisdom books, and the Prophets. Tracks shorter than 365
//! chapters wrap around, which is how the shorter tracks come around more
//! than once in a year.

use crate::model::date::{DAYS_IN_YEAR, PlanDate};
use crate::model::reading::{Reading, ReadingId};

/// Plan identifier; also the prefix of every reading id.
pub const PLAN_ID: &str = "mcheyne";

/// Readings per day.
pub const COLUMNS: u8 = 4;

/// Fixed reading count: 365 days x 4 columns.
pub const TOTAL_READINGS: usize = DAYS_IN_YEAR as usize * COLUMNS as usize;

type Track = &'static [(&'static str, u16)];

const FAMILY_OLD_TESTAMENT: Track = &[
    ("Genesis", 50),
    ("Exodus", 40),
    ("Leviticus", 27),
    ("Numbers", 36),
    ("Deuteronomy", 34),
    ("Joshua", 24),
    ("Judges", 21),
    ("Ruth", 4),
    ("1 Samuel", 31),
    ("2 Samuel", 24),
    ("1 Kings", 22),
    ("2 Kings", 25),
    ("1 Chronicles", 29),
    ("2 Chronicles", 36),
    ("Ezra", 10),
    ("Nehemiah", 13),
    ("Esther", 10),
];

const FAMILY_NEW_TESTAMENT: Track = &[
    ("Matthew", 28),
    ("Mark", 16),
    ("Luke", 24),
    ("John", 21),
    ("Acts", 28),
    ("Romans", 16),
    ("1 Corinthians", 16),
    ("2 Corinthians", 13),
    ("Galatians", 6),
    ("Ephesians", 6),
    ("Philippians", 4),
    ("Colossians", 4),
    ("1 Thessalonians", 5),
    ("2 Thessalonians", 3),
    ("1 Timothy", 6),
    ("2 Timothy", 4),
    ("Titus", 3),
    ("Philemon", 1),
    ("Hebrews", 13),
    ("James", 5),
    ("1 Peter", 5),
    ("2 Peter", 3),
    ("1 John", 5),
    ("2 John", 1),
    ("3 John", 1),
    ("Jude", 1),
    ("Revelation", 22),
];

const SECRET_PSALMS_WISDOM: Track = &[
    ("Job", 42),
    ("Psalm", 150),
    ("Proverbs", 31),
    ("Ecclesiastes", 12),
    ("Song of Solomon", 8),
];

const SECRET_PROPHETS: Track = &[
    ("Isaiah", 66),
    ("Jeremiah", 52),
    ("Lamentations", 5),
    ("Ezekiel", 48),
    ("Daniel", 12),
    ("Hosea", 14),
    ("Joel", 3),
    ("Amos", 9),
    ("Obadiah", 1),
    ("Jonah", 4),
    ("Micah", 7),
    ("Nahum", 3),
    ("Habakkuk", 3),
    ("Zephaniah", 3),
    ("Haggai", 2),
    ("Zechariah", 14),
    ("Malachi", 4),
];

const TRACKS: [Track; COLUMNS as usize] = [
    FAMILY_OLD_TESTAMENT,
    FAMILY_NEW_TESTAMENT,
    SECRET_PSALMS_WISDOM,
    SECRET_PROPHETS,
];

fn track_chapters(track: Track) -> u16 {
    track.iter().map(|(_, chapters)| *chapters).sum()
}

/// Passage reference at `offset` chapters into a track (0-based).
fn reference_at(track: Track, offset: u16) -> String {
    let mut remaining = offset;
    for (book, chapters) in track {
        if remaining < *chapters {
            return format!("{book} {}", remaining + 1);
        }
        remaining -= *chapters;
    }
    unreachable!("offset is reduced modulo the track length");
}

/// Generate the full M'Cheyne year.
///
/// Pure and deterministic: the same 1460 readings in the same order on
/// every call, with ids derivable from `(plan, day, column)` alone.
#[must_use]
pub fn generate() -> Vec<Reading> {
    let mut readings = Vec::with_capacity(TOTAL_READINGS);

    for day in 1..=DAYS_IN_YEAR {
        let date = PlanDate::from_day_of_year(day).expect("day within the plan year");
        for (column, track) in (0..COLUMNS).zip(TRACKS) {
            let offset = (day - 1) % track_chapters(track);
            readings.push(Reading {
                id: ReadingId::new(PLAN_ID, day, column),
                date,
                name: reference_at(track, offset),
                plan_id: PLAN_ID.to_string(),
            });
        }
    }

    readings
}
