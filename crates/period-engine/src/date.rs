//! Compact calendar dates and inclusive day ranges.
//!
//! [`IntegerDate`] is the interchange format shared with storage and query
//! code: a Gregorian date written as the decimal integer `YYYYMMDD`
//! (e.g. `20200907`). Because the fields are laid out most-significant
//! first, numeric order is chronological order.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ── IntegerDate ─────────────────────────────────────────────────────────────

/// A calendar day encoded as `YYYYMMDD`.
///
/// Always holds a valid date with a year in `1..=9999`, so every value has
/// exactly eight digits' worth of meaning and converts back to a
/// [`NaiveDate`] without failure.
///
/// # Examples
///
/// ```
/// use period_engine::IntegerDate;
///
/// let date = IntegerDate::new(20200229).unwrap();
/// assert_eq!(date.year(), 2020);
/// assert_eq!(date.succ().unwrap().value(), 20200301);
/// assert!(IntegerDate::new(20190229).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IntegerDate(NaiveDate);

impl IntegerDate {
    /// Build from a raw `YYYYMMDD` integer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] if the integer does not name a
    /// real calendar day with a four-digit year.
    pub fn new(value: u32) -> Result<Self> {
        Self::from_ymd((value / 10_000) as i32, value / 100 % 100, value % 100)
            .map_err(|_| EngineError::InvalidDate(format!("'{value}' is not a YYYYMMDD date")))
    }

    /// Build from year, month and day components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            EngineError::InvalidDate(format!("{year:04}-{month:02}-{day:02} does not exist"))
        })?;
        Self::from_date(date)
    }

    /// Convert a native date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] for years outside `1..=9999`,
    /// which have no `YYYYMMDD` encoding.
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        if (1..=9999).contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(EngineError::InvalidDate(format!(
                "{date} is outside the YYYYMMDD year range"
            )))
        }
    }

    pub fn to_date(self) -> NaiveDate {
        self.0
    }

    /// The `YYYYMMDD` integer.
    pub fn value(self) -> u32 {
        self.0.year() as u32 * 10_000 + self.0.month() * 100 + self.0.day()
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Shift by a signed number of days, or `None` when leaving the
    /// representable range.
    pub fn add_days(self, days: i64) -> Option<Self> {
        let shifted = self.0.checked_add_signed(Duration::try_days(days)?)?;
        Self::from_date(shifted).ok()
    }

    /// The following day.
    pub fn succ(self) -> Option<Self> {
        self.add_days(1)
    }

    /// The preceding day.
    pub fn pred(self) -> Option<Self> {
        self.add_days(-1)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(self, other: IntegerDate) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl fmt::Display for IntegerDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.value())
    }
}

impl FromStr for IntegerDate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::InvalidDate(format!(
                "'{trimmed}' is not an 8-digit YYYYMMDD date"
            )));
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|_| EngineError::InvalidDate(format!("'{trimmed}'")))?;
        Self::new(value)
    }
}

impl TryFrom<u32> for IntegerDate {
    type Error = EngineError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<NaiveDate> for IntegerDate {
    type Error = EngineError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::from_date(date)
    }
}

impl From<IntegerDate> for u32 {
    fn from(date: IntegerDate) -> Self {
        date.value()
    }
}

impl From<IntegerDate> for NaiveDate {
    fn from(date: IntegerDate) -> Self {
        date.0
    }
}

// ── DateRange ───────────────────────────────────────────────────────────────

/// An inclusive run of days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: IntegerDate,
    pub end: IntegerDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRange`] when `start` is after `end`.
    pub fn new(start: IntegerDate, end: IntegerDate) -> Result<Self> {
        if start > end {
            return Err(EngineError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from native dates, converting both endpoints.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(IntegerDate::from_date(start)?, IntegerDate::from_date(end)?)
    }

    /// A single-day range.
    pub fn day(date: IntegerDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: IntegerDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `other` lies entirely inside this range.
    pub fn covers(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of days in the range (always at least 1).
    pub fn len_days(&self) -> usize {
        self.start.days_until(self.end) as usize + 1
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = IntegerDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| {
            if *day < end {
                day.succ()
            } else {
                None
            }
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: u32) -> IntegerDate {
        IntegerDate::new(value).unwrap()
    }

    #[test]
    fn test_value_roundtrips_through_components() {
        let date = d(20200907);
        assert_eq!((date.year(), date.month(), date.day()), (2020, 9, 7));
        assert_eq!(date.value(), 20200907);
        assert_eq!(date.to_string(), "20200907");
    }

    #[test]
    fn test_rejects_impossible_days() {
        assert!(IntegerDate::new(20200230).is_err());
        assert!(IntegerDate::new(20201301).is_err());
        assert!(IntegerDate::new(20200100).is_err());
        assert!(IntegerDate::new(101).is_err());
    }

    #[test]
    fn test_rejects_years_without_encoding() {
        let bc = NaiveDate::from_ymd_opt(-44, 3, 15).unwrap();
        assert!(IntegerDate::from_date(bc).is_err());
    }

    #[test]
    fn test_numeric_order_is_chronological() {
        assert!(d(20191231) < d(20200101));
        assert!(d(20200131) < d(20200201));
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(d(20200228).add_days(2), Some(d(20200301)));
        assert_eq!(d(20200101).pred(), Some(d(20191231)));
        assert_eq!(d(99991231).succ(), None);
    }

    #[test]
    fn test_days_until_is_signed() {
        assert_eq!(d(20200101).days_until(d(20200301)), 60);
        assert_eq!(d(20200301).days_until(d(20200101)), -60);
    }

    #[test]
    fn test_from_str_requires_eight_digits() {
        assert_eq!("20200202".parse::<IntegerDate>().unwrap(), d(20200202));
        assert!("2020-02-02".parse::<IntegerDate>().is_err());
        assert!("202002".parse::<IntegerDate>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&d(20200202)).unwrap();
        assert_eq!(json, "20200202");
        let back: IntegerDate = serde_json::from_str("20200202").unwrap();
        assert_eq!(back, d(20200202));
        assert!(serde_json::from_str::<IntegerDate>("20200231").is_err());
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d(20200202), d(20200201)).is_err());
    }

    #[test]
    fn test_range_days_iterates_inclusive() {
        let range = DateRange::new(d(20200227), d(20200302)).unwrap();
        let days: Vec<u32> = range.days().map(IntegerDate::value).collect();
        assert_eq!(days, vec![20200227, 20200228, 20200229, 20200301, 20200302]);
        assert_eq!(range.len_days(), 5);
    }

    #[test]
    fn test_range_covers() {
        let year = DateRange::new(d(20200101), d(20201231)).unwrap();
        let march = DateRange::new(d(20200301), d(20200331)).unwrap();
        assert!(year.covers(&march));
        assert!(!march.covers(&year));
        assert!(march.contains(d(20200315)));
    }
}
