//! Conversion of 12-hour display times into zoned timestamp strings.
//!
//! Dining pages publish windows such as `"7:00 am - 10:00 am"`. Each
//! boundary is turned into `"{date} {HH}:{MM}:00{offset}"` using a fixed,
//! configured UTC offset. Text that does not contain a clock time is passed
//! through unchanged, so callers must run [`is_timestamp`] before treating
//! a result as a schedule boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(am|pm)").expect("valid clock regex"));

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})[+-]\d{2}(:\d{2})?$")
        .expect("valid timestamp regex")
});

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])(\d{2})(?::?(\d{2}))?$").expect("valid offset regex")
});

/// A fixed UTC offset as written in timestamps: `-05`, `+05:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcOffset {
    minutes: i32,
}

impl UtcOffset {
    /// Offset used by the Philadelphia campus pages (EST, no DST adjustment).
    pub const EASTERN_STANDARD: UtcOffset = UtcOffset { minutes: -5 * 60 };

    pub fn from_minutes(minutes: i32) -> Option<Self> {
        (minutes.abs() < 24 * 60).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn to_fixed_offset(&self) -> FixedOffset {
        // Range is checked on construction.
        FixedOffset::east_opt(self.minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The calendar date at `now` as seen from this offset.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.to_fixed_offset()).date_naive()
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        Self::EASTERN_STANDARD
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let hours = self.minutes.abs() / 60;
        let minutes = self.minutes.abs() % 60;
        if minutes == 0 {
            write!(f, "{}{:02}", sign, hours)
        } else {
            write!(f, "{}{:02}:{:02}", sign, hours, minutes)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid UTC offset '{0}', expected e.g. -05 or +05:30")]
pub struct InvalidOffset(pub String);

impl FromStr for UtcOffset {
    type Err = InvalidOffset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidOffset(s.to_string());
        let caps = OFFSET_RE.captures(s.trim()).ok_or_else(invalid)?;

        let hours: i32 = caps[2].parse().map_err(|_| invalid())?;
        let minutes: i32 = match caps.get(3) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        let total = hours * 60 + minutes;
        let total = if &caps[1] == "-" { -total } else { total };
        UtcOffset::from_minutes(total).ok_or_else(invalid)
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = InvalidOffset;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UtcOffset> for String {
    fn from(value: UtcOffset) -> Self {
        value.to_string()
    }
}

/// Converts `"5:00 pm"` on `2024-03-01` into `"2024-03-01 17:00:00-05"`.
///
/// Returns `time_text` unchanged when no valid 12-hour clock time is found.
pub fn normalize(time_text: &str, date: NaiveDate, offset: UtcOffset) -> String {
    let Some(caps) = CLOCK_RE.captures(time_text) else {
        return time_text.to_string();
    };

    let (Ok(hour), Ok(minute)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return time_text.to_string();
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return time_text.to_string();
    }

    let pm = caps[3].eq_ignore_ascii_case("pm");
    let hour = match (pm, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    };

    format!(
        "{} {:02}:{}:00{}",
        date.format("%Y-%m-%d"),
        hour,
        &caps[2],
        offset
    )
}

/// Strict check that `value` is a timestamp produced by [`normalize`].
pub fn is_timestamp(value: &str) -> bool {
    TIMESTAMP_RE
        .captures(value)
        .map(|caps| NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%d %H:%M:%S").is_ok())
        .unwrap_or(false)
}

/// Splits `"7:00 am - 10:00 am"` into its two boundaries.
///
/// Boundaries are the first two clock times in the text, so any separator
/// works and surrounding prose such as "Open to all" is ignored.
pub fn split_time_window(window: &str) -> Option<(&str, &str)> {
    let mut clocks = CLOCK_RE.find_iter(window);
    Some((clocks.next()?.as_str(), clocks.next()?.as_str()))
}

/// Resolves a raw window into two timestamps, or `None` if either boundary
/// does not normalize.
pub fn resolve_window(window: &str, date: NaiveDate, offset: UtcOffset) -> Option<(String, String)> {
    let (start, end) = split_time_window(window)?;
    let start = normalize(start, date, offset);
    let end = normalize(end, date, offset);
    (is_timestamp(&start) && is_timestamp(&end)).then_some((start, end))
}
