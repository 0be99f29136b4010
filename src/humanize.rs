//! Relative rendering of release timestamps ("3 days ago")

use chrono::{NaiveDateTime, TimeDelta};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Format used once a timestamp is more than a week old or lies in the future
const ABSOLUTE_DATE_FORMAT: &str = "%A %B %d, %Y";

/// Render `past` relative to `now` as a short phrase.
///
/// Anything older than a week, or later than `now`, is shown as a calendar
/// date instead (e.g. "Monday January 01, 2024").
pub fn humanize(now: NaiveDateTime, past: NaiveDateTime) -> String {
    let delta = now - past;
    if delta < TimeDelta::zero() {
        return past.format(ABSOLUTE_DATE_FORMAT).to_string();
    }

    let total = delta.num_seconds();
    let days = total / SECONDS_PER_DAY;
    let seconds = total % SECONDS_PER_DAY;

    match (days, seconds) {
        (d, _) if d > 7 => past.format(ABSOLUTE_DATE_FORMAT).to_string(),
        (1, _) => "1 day ago".to_string(),
        (d, _) if d > 1 => format!("{} days ago", d),
        (_, s) if s <= 1 => "just now".to_string(),
        (_, s) if s < 60 => format!("{} seconds ago", s),
        (_, s) if s < 120 => "1 minute ago".to_string(),
        (_, s) if s < 3600 => format!("{} minutes ago", s / 60),
        (_, s) if s < 7200 => "1 hour ago".to_string(),
        (_, s) => format!("{} hours ago", s / 3600),
    }
}
