//! Classify a date interval as a canonical calendar period.
//!
//! Given `[start, end]` and a reference date, [`classify_range`] decides
//! whether the interval is exactly one Sunday week, one calendar month or one
//! calendar year, and how many such periods separate it from the reference.
//! Voice commands and UI labels use this to phrase a range relative to
//! "now" ("last week", "this month", "2 years ago").

use chrono::NaiveDate;
use serde::Serialize;

use crate::date::IntegerDate;
use crate::period::PeriodKind;

/// A range recognised as exactly one period of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeSemantic {
    pub kind: PeriodKind,
    /// `index_of(reference) - index_of(start)` under `kind`'s numbering.
    /// Positive when the reference lies after the range.
    pub offset: i64,
}

impl RangeSemantic {
    /// Render the relative label for this period.
    ///
    /// ```
    /// use period_engine::{PeriodKind, RangeSemantic};
    ///
    /// let last_week = RangeSemantic { kind: PeriodKind::SundayWeek, offset: 1 };
    /// assert_eq!(last_week.phrase(), "last week");
    /// let future = RangeSemantic { kind: PeriodKind::Month, offset: -3 };
    /// assert_eq!(future.phrase(), "in 3 months");
    /// ```
    pub fn phrase(&self) -> String {
        let noun = self.kind.noun();
        match self.offset {
            0 => format!("this {noun}"),
            1 => format!("last {noun}"),
            -1 => format!("next {noun}"),
            n if n > 1 => format!("{n} {noun}s ago"),
            n => format!("in {} {noun}s", n.unsigned_abs()),
        }
    }
}

/// Classify `[start, end]` against `reference`.
///
/// Kinds are tried in the order week, month, year; the first whose period
/// containing `start` begins exactly at `start` and ends exactly at `end`
/// wins. Returns `None` when the interval is not a whole period.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use period_engine::{classify_range, IntegerDate, PeriodKind};
///
/// let start = IntegerDate::new(20200202).unwrap();
/// let end = IntegerDate::new(20200208).unwrap();
/// let today = NaiveDate::from_ymd_opt(2020, 2, 9).unwrap();
///
/// let semantic = classify_range(start, end, today).unwrap();
/// assert_eq!(semantic.kind, PeriodKind::SundayWeek);
/// assert_eq!(semantic.offset, 1);
/// ```
pub fn classify_range(
    start: IntegerDate,
    end: IntegerDate,
    reference: NaiveDate,
) -> Option<RangeSemantic> {
    let start_date = start.to_date();
    let end_date = end.to_date();

    PeriodKind::ALL.into_iter().find_map(|kind| {
        let fits = kind.start_of(start_date) == start_date && kind.end_of(start_date) == end_date;
        fits.then(|| RangeSemantic {
            kind,
            offset: kind.index_of(reference) - kind.index_of(start_date),
        })
    })
}
