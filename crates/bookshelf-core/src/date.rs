//! Dates without time information, tolerant of partial precision.
//!
//! The catalog data mixes strict ISO dates (`1998-01-07`), bare years
//! (`1998`), and years buried in free-form copyright text. [`Date`] models
//! all three with a single type: each field may be zero, and a zero year
//! means the date is absent entirely. Comparisons operate at the coarsest
//! precision the two operands share.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Matches a four-digit year at word boundaries, optionally followed by
/// `MM` and `DD` separated by `.`, `/`, or `-`. The word boundaries keep
/// digits embedded in longer tokens (`xyz2011`) from parsing as dates.
static DATE_PAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]{4})(?:[./-]([0-9]{1,2})[./-]([0-9]{1,2}))?\b")
        .expect("date pattern is valid")
});

/// A date with optional month/day precision. A zero `year` means "absent".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    /// A date carrying only a year.
    pub const fn from_year(year: i32) -> Self {
        Self {
            year,
            month: 0,
            day: 0,
        }
    }

    /// A fully specified date.
    pub const fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Returns true if this is the absent date.
    pub fn is_zero(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Finds the first date-like substring in `s`.
    ///
    /// Returns the parsed date and the byte offset just past the match, so
    /// callers can continue scanning the tail. When nothing matches, the
    /// result is the zero date and offset 0.
    pub fn parse(s: &str) -> (Date, usize) {
        let Some(caps) = DATE_PAT.captures(s) else {
            return (Date::default(), 0);
        };
        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let year = caps[1].parse().unwrap_or(0);
        match (caps.get(2), caps.get(3)) {
            (Some(m), Some(d)) => {
                let month = m.as_str().parse().unwrap_or(0);
                let day = d.as_str().parse().unwrap_or(0);
                (Date::from_ymd(year, month, day), end)
            }
            _ => (Date::from_year(year), end),
        }
    }

    /// Collects every date-like substring in `s`, in order of appearance.
    pub fn parse_all(s: &str) -> Vec<Date> {
        let mut dates = Vec::new();
        let mut rest = s;
        loop {
            let (d, ix) = Date::parse(rest);
            if ix == 0 {
                break;
            }
            dates.push(d);
            rest = &rest[ix..];
        }
        dates
    }

    /// Compares two dates at the precision both sides share.
    ///
    /// An absent date orders below any present date and equal to another
    /// absent date. If either side lacks a month or day, only the years are
    /// compared; otherwise the comparison is lexicographic over
    /// (year, month, day).
    ///
    /// This is deliberately not an `Ord` impl: mixed-precision comparison
    /// is not a total order (`2020` equals both `2020-02-03` and
    /// `2020-12-25`, which differ from each other).
    pub fn compare_to(&self, other: &Date) -> Ordering {
        if self.year == 0 {
            return if other.year == 0 {
                Ordering::Equal
            } else {
                Ordering::Less
            };
        }
        if self.month == 0 || self.day == 0 {
            return self.year.cmp(&other.year);
        }
        if other.year == 0 {
            return Ordering::Greater;
        }
        if other.month == 0 || other.day == 0 {
            return self.year.cmp(&other.year);
        }
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl fmt::Display for Date {
    /// Renders at the precision actually present: `N/A`, `YYYY`, or
    /// `YYYY-MM-DD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year == 0 {
            write!(f, "N/A")
        } else if self.month == 0 || self.day == 0 {
            write!(f, "{}", self.year)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "N/A" {
            return Ok(Date::default());
        }
        let (date, ix) = Date::parse(&s);
        if ix == 0 {
            return Err(de::Error::custom(format!("unrecognized date: {s:?}")));
        }
        Ok(date)
    }
}
