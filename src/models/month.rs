//! Calendar month representation
//!
//! A `Month` names one calendar month ("2025-03") and is the key for
//! monthly allocations and all per-month derivations.

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month; `month` must be 1-12
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing today (local time)
    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap())
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whole calendar months from `earlier` to `self`
    ///
    /// Negative when `self` precedes `earlier`; day-of-month is ignored.
    pub fn months_since(&self, earlier: Month) -> i64 {
        i64::from(self.year - earlier.year) * 12 + i64::from(self.month) - i64::from(earlier.month)
    }

    /// Iterate months from `from` through `to`, inclusive
    ///
    /// Empty when `to` precedes `from`.
    pub fn span(from: Month, to: Month) -> impl Iterator<Item = Month> {
        let count = if to < from {
            0
        } else {
            to.months_since(from) + 1
        };
        std::iter::successors(Some(from), |m| Some(m.next())).take(count as usize)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| MonthParseError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthParseError::InvalidFormat(s) => write!(f, "Invalid month format: {}", s),
            MonthParseError::InvalidMonth(m) => write!(f, "Invalid month number: {}", m),
        }
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, m: u32) -> Month {
        Month::new(year, m).unwrap()
    }

    #[test]
    fn test_bounds() {
        let jan = month(2025, 1);
        assert_eq!(jan.start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(jan.end_date(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());

        let feb = month(2024, 2); // leap year
        assert_eq!(feb.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_contains() {
        let mar = month(2025, 3);
        assert!(mar.contains(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        assert!(!mar.contains(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }

    #[test]
    fn test_navigation() {
        assert_eq!(month(2024, 12).next(), month(2025, 1));
        assert_eq!(month(2025, 1).prev(), month(2024, 12));
        assert_eq!(month(2025, 6).next(), month(2025, 7));
    }

    #[test]
    fn test_months_since() {
        assert_eq!(month(2025, 3).months_since(month(2025, 1)), 2);
        assert_eq!(month(2025, 1).months_since(month(2024, 11)), 2);
        assert_eq!(month(2025, 1).months_since(month(2025, 1)), 0);
        assert_eq!(month(2024, 12).months_since(month(2025, 1)), -1);
    }

    #[test]
    fn test_span() {
        let months: Vec<Month> = Month::span(month(2024, 11), month(2025, 2)).collect();
        assert_eq!(
            months,
            vec![month(2024, 11), month(2024, 12), month(2025, 1), month(2025, 2)]
        );

        let empty: Vec<Month> = Month::span(month(2025, 2), month(2025, 1)).collect();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_and_display() {
        let m: Month = "2025-07".parse().unwrap();
        assert_eq!(m, month(2025, 7));
        assert_eq!(m.to_string(), "2025-07");

        assert!("2025-13".parse::<Month>().is_err());
        assert!("garbage".parse::<Month>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(month(2024, 12) < month(2025, 1));
        assert!(month(2025, 2) > month(2025, 1));
    }

    #[test]
    fn test_serialization() {
        let m = month(2025, 4);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2025-04\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
