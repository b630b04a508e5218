//! Calendar period arithmetic.
//!
//! Pure helpers for the boundaries and numbering of weeks, months and years.
//! Everything here takes explicit dates (no system clock access) so callers
//! supply the reference "today".
//!
//! # Period indices
//!
//! A period index numbers successive periods of one kind with consecutive
//! integers, so the signed distance between two dates measured in periods is
//! a plain subtraction:
//!
//! - weeks: Sunday-aligned seven-day blocks counted from the proleptic
//!   Gregorian epoch ([`week_index`])
//! - months: `year * 12 + month0` ([`month_index`])
//! - years: the year number ([`year_index`])

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date::{DateRange, IntegerDate};

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins a week for period computations ("this week",
/// "last week", "monday of this week").
///
/// Canonical [`PeriodKind::SundayWeek`] periods always start on Sunday
/// regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

/// How many days `weekday` is from the week-start day.
pub fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
        WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
    }
}

// ── Boundaries ──────────────────────────────────────────────────────────────

pub fn start_of_week(date: NaiveDate, week_start: WeekStartDay) -> NaiveDate {
    date - Duration::days(days_from_week_start(date.weekday(), week_start))
}

pub fn end_of_week(date: NaiveDate, week_start: WeekStartDay) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(6)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        // December of the last representable year
        .unwrap_or_else(|| first.with_day(31).unwrap_or(first))
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Last day of `month` (1-based) in `year`, or `None` for an invalid month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| end_of_month(first).day())
}

// ── Shifting ────────────────────────────────────────────────────────────────

/// Shift by whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Shift by whole years; February 29 lands on February 28 in common years.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

pub fn add_weeks(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_weeks(weeks)?)
}

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

// ── Weekdays ────────────────────────────────────────────────────────────────

/// Most recent `weekday` on or before `date`.
pub fn weekday_on_or_before(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64
        + 7)
        % 7;
    date - Duration::days(back)
}

/// Find the Nth occurrence of a weekday in a given month.
///
/// `ordinal` is 1-based from the start of the month; negative values count
/// from the end (-1 is the last occurrence). Returns `None` when the month has
/// no such occurrence.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: i32,
) -> Option<NaiveDate> {
    let target = if ordinal > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let diff = (weekday.num_days_from_monday() as i64
            - first.weekday().num_days_from_monday() as i64
            + 7)
            % 7;
        first + Duration::days(diff) + Duration::weeks((ordinal - 1) as i64)
    } else if ordinal < 0 {
        let last = end_of_month(NaiveDate::from_ymd_opt(year, month, 1)?);
        weekday_on_or_before(last, weekday) - Duration::weeks((-ordinal - 1) as i64)
    } else {
        return None;
    };
    (target.month() == month && target.year() == year).then_some(target)
}

// ── Indices ─────────────────────────────────────────────────────────────────

/// Index of the Sunday-aligned week containing `date`.
///
/// Consecutive Sunday weeks differ by exactly one.
pub fn week_index(date: NaiveDate) -> i64 {
    let sunday = start_of_week(date, WeekStartDay::Sunday);
    (sunday.num_days_from_ce() as i64).div_euclid(7)
}

pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

pub fn year_index(date: NaiveDate) -> i64 {
    date.year() as i64
}

// ── PeriodKind ──────────────────────────────────────────────────────────────

/// A canonical recurring calendar granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodKind {
    /// Sunday through Saturday.
    SundayWeek,
    Month,
    Year,
}

impl PeriodKind {
    /// Every kind, in classification priority order.
    pub const ALL: [PeriodKind; 3] = [PeriodKind::SundayWeek, PeriodKind::Month, PeriodKind::Year];

    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodKind::SundayWeek => start_of_week(date, WeekStartDay::Sunday),
            PeriodKind::Month => start_of_month(date),
            PeriodKind::Year => start_of_year(date),
        }
    }

    pub fn end_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodKind::SundayWeek => end_of_week(date, WeekStartDay::Sunday),
            PeriodKind::Month => end_of_month(date),
            PeriodKind::Year => end_of_year(date),
        }
    }

    pub fn index_of(self, date: NaiveDate) -> i64 {
        match self {
            PeriodKind::SundayWeek => week_index(date),
            PeriodKind::Month => month_index(date),
            PeriodKind::Year => year_index(date),
        }
    }

    /// Singular noun used in phrases ("week", "month", "year").
    pub fn noun(self) -> &'static str {
        match self {
            PeriodKind::SundayWeek => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        }
    }
}

// ── Range subtraction ───────────────────────────────────────────────────────

/// The result of removing one range from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSubtraction {
    /// `true` when the ranges overlap or touch (no day lies strictly between
    /// them).
    pub overlap: bool,
    /// Pieces of the minuend outside the subtrahend, in ascending order.
    /// Empty when the ranges do not overlap.
    pub rest: Vec<DateRange>,
}

/// Subtract `b` from `a`.
///
/// # Examples
///
/// ```
/// use period_engine::{period::subtract_range, DateRange, IntegerDate};
///
/// let d = |v| IntegerDate::new(v).unwrap();
/// let request = DateRange::new(d(20200101), d(20201231)).unwrap();
/// let cached = DateRange::new(d(20200301), d(20200331)).unwrap();
///
/// let result = subtract_range(&request, &cached);
/// assert!(result.overlap);
/// assert_eq!(result.rest.len(), 2);
/// assert_eq!(result.rest[0].end, d(20200229));
/// assert_eq!(result.rest[1].start, d(20200401));
/// ```
pub fn subtract_range(a: &DateRange, b: &DateRange) -> RangeSubtraction {
    let touches_left = b.start.pred().is_some_and(|before| a.end >= before);
    let touches_right = b.end.succ().is_some_and(|after| a.start <= after);
    let overlap = (a.end >= b.start || touches_left) && (a.start <= b.end || touches_right);

    if !overlap {
        return RangeSubtraction {
            overlap,
            rest: Vec::new(),
        };
    }

    let mut rest = Vec::with_capacity(2);
    if a.start < b.start {
        if let Some(left_end) = b.start.pred() {
            rest.push(DateRange {
                start: a.start,
                end: left_end.min(a.end),
            });
        }
    }
    if a.end > b.end {
        if let Some(right_start) = b.end.succ() {
            rest.push(DateRange {
                start: right_start.max(a.start),
                end: a.end,
            });
        }
    }
    RangeSubtraction { overlap, rest }
}

/// The whole calendar years spanning `start` and `end`: January 1 of the
/// first year through December 31 of the last.
pub fn covering_years(start: IntegerDate, end: IntegerDate) -> DateRange {
    let first = IntegerDate::from_date(start_of_year(start.to_date())).unwrap_or(start);
    let last = IntegerDate::from_date(end_of_year(end.to_date())).unwrap_or(end);
    DateRange {
        start: first,
        end: last,
    }
}
