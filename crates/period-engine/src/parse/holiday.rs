//! US holidays by name: "thanksgiving", "mother's day", "easter 2018".

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};

use super::result::{Certainty, ParsedComponents, ParsedResult, Tag};
use super::{cached_pattern, MatchContext};
use crate::period::nth_weekday_of_month;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holiday {
    NewYearsDay,
    ValentinesDay,
    MartinLutherKingDay,
    PresidentsDay,
    Easter,
    MothersDay,
    MemorialDay,
    FathersDay,
    IndependenceDay,
    LaborDay,
    ColumbusDay,
    Halloween,
    VeteransDay,
    Thanksgiving,
    Christmas,
}

/// "<name>'s day" with the possessive and "day" optional.
macro_rules! possessive_day {
    ($name:literal) => {
        concat!($name, r"['’]?s?(?:\s+day)?")
    };
}

/// Name patterns, tried in order. The position doubles as the capture group
/// suffix in the combined pattern.
const HOLIDAYS: [(Holiday, &str); 15] = [
    (Holiday::NewYearsDay, possessive_day!(r"new\s+year")),
    (Holiday::ValentinesDay, possessive_day!("valentine")),
    (
        Holiday::MartinLutherKingDay,
        possessive_day!(r"(?:martin\s+luther(?:\s+king)?(?:\s+jr\.?)?(?:\s+junior)?|mlk)"),
    ),
    (Holiday::PresidentsDay, possessive_day!("president")),
    (Holiday::Easter, r"easter(?:\s+sunday)?"),
    (Holiday::MothersDay, possessive_day!("mother")),
    (Holiday::MemorialDay, r"memorial\s+day"),
    (Holiday::FathersDay, possessive_day!("father")),
    (Holiday::IndependenceDay, r"independence\s+day"),
    (Holiday::LaborDay, r"labou?r\s+day"),
    (Holiday::ColumbusDay, possessive_day!("columbus")),
    (Holiday::Halloween, r"hallowe'?en"),
    (Holiday::VeteransDay, possessive_day!("veteran")),
    (Holiday::Thanksgiving, r"thanksgiving(?:\s+day)?"),
    (Holiday::Christmas, r"christmas(?:\s+day)?|xmas"),
];

impl Holiday {
    /// The date this holiday falls on in `year`.
    fn date_in(self, year: i32) -> Option<NaiveDate> {
        let fixed = |month, day| NaiveDate::from_ymd_opt(year, month, day);
        match self {
            Holiday::NewYearsDay => fixed(1, 1),
            Holiday::ValentinesDay => fixed(2, 14),
            Holiday::MartinLutherKingDay => nth_weekday_of_month(year, 1, Weekday::Mon, 3),
            Holiday::PresidentsDay => nth_weekday_of_month(year, 2, Weekday::Mon, 3),
            Holiday::Easter => easter_sunday(year),
            Holiday::MothersDay => nth_weekday_of_month(year, 5, Weekday::Sun, 2),
            Holiday::MemorialDay => nth_weekday_of_month(year, 5, Weekday::Mon, -1),
            Holiday::FathersDay => nth_weekday_of_month(year, 6, Weekday::Sun, 3),
            Holiday::IndependenceDay => fixed(7, 4),
            Holiday::LaborDay => nth_weekday_of_month(year, 9, Weekday::Mon, 1),
            Holiday::ColumbusDay => nth_weekday_of_month(year, 10, Weekday::Mon, 2),
            Holiday::Halloween => fixed(10, 31),
            Holiday::VeteransDay => fixed(11, 11),
            Holiday::Thanksgiving => nth_weekday_of_month(year, 11, Weekday::Thu, 4),
            Holiday::Christmas => fixed(12, 25),
        }
    }
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

pub(super) fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        let names = HOLIDAYS
            .iter()
            .enumerate()
            .map(|(i, (_, name))| format!("(?P<h{i}>{name})"))
            .collect::<Vec<_>>()
            .join("|");
        format!(
            r"\b(?:(?P<year1>[12]\d{{3}})(?:'s)?\s+)?(?:{names})(?:\s+(?:(?:of|in)\s+)?(?P<year2>[12]\d{{3}}))?\b"
        )
    })
}

pub(super) fn extract(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let (holiday, _) = HOLIDAYS
        .iter()
        .enumerate()
        .find(|(i, _)| caps.name(&format!("h{i}")).is_some())
        .map(|(_, entry)| *entry)?;
    let reference = ctx.reference;

    let date = match caps.name("year1").or_else(|| caps.name("year2")) {
        Some(year) => holiday.date_in(year.as_str().parse().ok()?)?,
        None => {
            // Most recent occurrence not after the reference day
            let this_year = holiday.date_in(reference.year())?;
            if this_year > reference {
                holiday.date_in(reference.year() - 1)?
            } else {
                this_year
            }
        }
    };

    let mut result = ParsedResult::from_match(whole, reference, Tag::Holiday);
    result.start = ParsedComponents::from_date(date, Certainty::Certain, reference);
    Some(result)
}
