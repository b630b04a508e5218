//! Parsed temporal spans and their per-field certainty.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use regex::Match;
use serde::Serialize;

use crate::date::DateRange;
use crate::period::{end_of_month, end_of_year, last_day_of_month, start_of_month, start_of_year};

/// Whether a component was stated in the text or filled in by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    /// A default the parser supplied (e.g. day 1 for "March").
    Implied,
    /// Explicitly stated, or derived from an explicit qualifier.
    Certain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Year,
    Month,
    Day,
    /// Days from Sunday (0-6).
    Weekday,
}

impl Field {
    const ALL: [Field; 4] = [Field::Year, Field::Month, Field::Day, Field::Weekday];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Component {
    pub value: i32,
    pub certainty: Certainty,
}

/// One endpoint of a parsed span: year, month, day and weekday, each absent,
/// implied or certain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedComponents {
    #[serde(skip)]
    reference: NaiveDate,
    year: Option<Component>,
    month: Option<Component>,
    day: Option<Component>,
    weekday: Option<Component>,
}

impl ParsedComponents {
    /// All components absent.
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference,
            year: None,
            month: None,
            day: None,
            weekday: None,
        }
    }

    /// Year, month and day of `date`, all with the given certainty.
    pub fn from_date(date: NaiveDate, certainty: Certainty, reference: NaiveDate) -> Self {
        let mut components = Self::new(reference);
        components.set_date(date, certainty);
        components
    }

    fn slot(&self, field: Field) -> &Option<Component> {
        match field {
            Field::Year => &self.year,
            Field::Month => &self.month,
            Field::Day => &self.day,
            Field::Weekday => &self.weekday,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<Component> {
        match field {
            Field::Year => &mut self.year,
            Field::Month => &mut self.month,
            Field::Day => &mut self.day,
            Field::Weekday => &mut self.weekday,
        }
    }

    pub fn component(&self, field: Field) -> Option<Component> {
        *self.slot(field)
    }

    pub fn get(&self, field: Field) -> Option<i32> {
        self.component(field).map(|c| c.value)
    }

    pub fn is_certain(&self, field: Field) -> bool {
        self.component(field)
            .is_some_and(|c| c.certainty == Certainty::Certain)
    }

    /// Set `field` as stated in the text.
    pub fn assign(&mut self, field: Field, value: i32) {
        *self.slot_mut(field) = Some(Component {
            value,
            certainty: Certainty::Certain,
        });
    }

    /// Set `field` as a default. Certain values are left untouched.
    pub fn imply(&mut self, field: Field, value: i32) {
        if !self.is_certain(field) {
            *self.slot_mut(field) = Some(Component {
                value,
                certainty: Certainty::Implied,
            });
        }
    }

    /// Overwrite year, month and day with `date`.
    pub(crate) fn set_date(&mut self, date: NaiveDate, certainty: Certainty) {
        for (field, value) in [
            (Field::Year, date.year()),
            (Field::Month, date.month() as i32),
            (Field::Day, date.day() as i32),
        ] {
            match certainty {
                Certainty::Certain => self.assign(field, value),
                Certainty::Implied => self.imply(field, value),
            }
        }
    }

    /// Certain year/month/day values.
    pub(crate) fn certain_date_fields(&self) -> Vec<(Field, i32)> {
        let mut fields = self.known_values();
        fields.retain(|(field, _)| *field != Field::Weekday);
        fields
    }

    /// Whether the stored values name a real calendar day.
    pub fn is_valid(&self) -> bool {
        let year = self.get(Field::Year).unwrap_or(self.reference.year());
        let month = self.get(Field::Month).unwrap_or(1);
        let day = self.get(Field::Day).unwrap_or(1);
        if !(1..=12).contains(&month) || day < 1 {
            return false;
        }
        last_day_of_month(year, month as u32).is_some_and(|last| day as u32 <= last)
    }

    /// Resolve to a calendar date.
    ///
    /// An absent year falls back to the reference year, an absent month to
    /// January and an absent day to the 1st.
    pub fn date(&self) -> NaiveDate {
        let year = self.get(Field::Year).unwrap_or(self.reference.year());
        let month = self.get(Field::Month).unwrap_or(1).clamp(1, 12) as u32;
        let last = last_day_of_month(year, month).unwrap_or(28);
        let day = (self.get(Field::Day).unwrap_or(1).max(1) as u32).min(last);
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or(self.reference)
    }

    /// The finest unit the text actually pinned down.
    pub fn granularity(&self) -> Granularity {
        if self.is_certain(Field::Day) || self.is_certain(Field::Weekday) {
            Granularity::Day
        } else if self.is_certain(Field::Month) {
            Granularity::Month
        } else if self.is_certain(Field::Year) {
            Granularity::Year
        } else {
            Granularity::Day
        }
    }

    /// Every certain field with its value.
    pub fn known_values(&self) -> Vec<(Field, i32)> {
        Field::ALL
            .into_iter()
            .filter(|f| self.is_certain(*f))
            .filter_map(|f| Some((f, self.get(f)?)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

/// Which parser or refiner contributed to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tag {
    MonthName,
    RelativePeriod,
    Weekday,
    Season,
    Holiday,
    RecentDays,
    IsoDate,
    MonthDay,
    Year,
    Casual,
    NearestWeekday,
    MergedRange,
    Since,
    Around,
}

/// A date or date range found in the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedResult {
    /// Byte offset of the match in the input.
    pub index: usize,
    /// The matched text.
    pub text: String,
    pub start: ParsedComponents,
    pub end: Option<ParsedComponents>,
    pub tags: BTreeSet<Tag>,
}

impl ParsedResult {
    pub(crate) fn from_match(m: Match<'_>, reference: NaiveDate, tag: Tag) -> Self {
        Self {
            index: m.start(),
            text: m.as_str().to_string(),
            start: ParsedComponents::new(reference),
            end: None,
            tags: BTreeSet::from([tag]),
        }
    }

    /// Byte offset one past the end of the match.
    pub fn end_index(&self) -> usize {
        self.index + self.text.len()
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.as_ref().map(ParsedComponents::date)
    }

    /// Granularity of the start endpoint.
    pub fn granularity(&self) -> Granularity {
        self.start.granularity()
    }

    /// Only a weekday was stated ("friday"), the date itself is inferred.
    pub fn is_only_weekday(&self) -> bool {
        !self.start.is_certain(Field::Day) && self.start.is_certain(Field::Weekday)
    }

    /// The concrete days this span denotes.
    ///
    /// Each endpoint is widened to its granularity, so "March" covers the
    /// whole month and "from 2019 to 2020" two whole years. Returns `None`
    /// when the span falls outside the `YYYYMMDD` year range or ends before
    /// it starts.
    pub fn to_range(&self) -> Option<DateRange> {
        let first = self.start.date();
        let start = match self.start.granularity() {
            Granularity::Day => first,
            Granularity::Month => start_of_month(first),
            Granularity::Year => start_of_year(first),
        };
        let last = self.end.as_ref().unwrap_or(&self.start);
        let end = match last.granularity() {
            Granularity::Day => last.date(),
            Granularity::Month => end_of_month(last.date()),
            Granularity::Year => end_of_year(last.date()),
        };
        DateRange::from_dates(start, end).ok()
    }
}
