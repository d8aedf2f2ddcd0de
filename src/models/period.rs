//! Calendar month periods
//!
//! Reports bucket transactions by calendar month, from the first to the last
//! day of the month in the observer's local calendar.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month (e.g. "2025-01")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month; `None` unless `month` is 1-12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in the local calendar
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("month is validated on creation")
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

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

    /// The month `count` months before this one
    pub fn minus(&self, count: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) - count as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The `count` months ending with `self`, oldest first
    pub fn trailing(&self, count: u32) -> Vec<Month> {
        (0..count).rev().map(|back| self.minus(back)).collect()
    }

    /// Chart label such as "Jan 2025"
    pub fn label(&self) -> String {
        self.start_date().format("%b %Y").to_string()
    }

    /// Abbreviated month name such as "Jan"
    pub fn short_label(&self) -> String {
        self.start_date().format("%b").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error returned for unparseable month strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthParseError(pub String);

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid month '{}', expected YYYY-MM", self.0)
    }
}

impl std::error::Error for MonthParseError {}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Month::new(year, month).ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = Month::new(2024, 2).unwrap();
        assert_eq!(feb.start_date(), date(2024, 2, 1));
        assert_eq!(feb.end_date(), date(2024, 2, 29));

        let dec = Month::new(2025, 12).unwrap();
        assert_eq!(dec.end_date(), date(2025, 12, 31));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let jan = Month::new(2025, 1).unwrap();
        assert!(jan.contains(date(2025, 1, 1)));
        assert!(jan.contains(date(2025, 1, 31)));
        assert!(!jan.contains(date(2025, 2, 1)));
        assert!(!jan.contains(date(2024, 1, 15)));
    }

    #[test]
    fn test_navigation_across_years() {
        let jan = Month::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), Month::new(2024, 12).unwrap());
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(jan.minus(13), Month::new(2023, 12).unwrap());
        assert_eq!(jan.minus(0), jan);
    }

    #[test]
    fn test_trailing_is_oldest_first() {
        let anchor = Month::new(2025, 2).unwrap();
        let months = anchor.trailing(3);
        assert_eq!(
            months,
            vec![
                Month::new(2024, 12).unwrap(),
                Month::new(2025, 1).unwrap(),
                Month::new(2025, 2).unwrap(),
            ]
        );
        assert!(anchor.trailing(0).is_empty());
    }

    #[test]
    fn test_labels() {
        let month = Month::new(2025, 3).unwrap();
        assert_eq!(month.label(), "Mar 2025");
        assert_eq!(month.short_label(), "Mar");
        assert_eq!(month.to_string(), "2025-03");
    }

    #[test]
    fn test_parse() {
        assert_eq!("2025-03".parse::<Month>().unwrap(), Month::new(2025, 3).unwrap());
        assert!("2025-13".parse::<Month>().is_err());
        assert!("March".parse::<Month>().is_err());
    }
}
