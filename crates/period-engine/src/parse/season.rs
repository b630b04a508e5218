//! Meteorological seasons: "spring", "last winter", "fall of 2017".

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use super::result::{Certainty, ParsedComponents, ParsedResult, Tag};
use super::vocab::qualifier_words;
use super::{cached_pattern, MatchContext};
use crate::period::end_of_month;

pub(super) fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"\b(?:(?P<year1>[12]\d{3})(?:'s)?\s+|(?P<last>(?:(?:last|past),?\s+)+))?(?P<season>spring|summer|fall|autumn|winter)\b(?:\s+(?:(?:of|in)\s+)?(?P<year2>[12]\d{3})\b)?"
            .to_string()
    })
}

/// First and last day of `season` in `year`. Winter runs from December of
/// `year` through February of the following year.
fn season_of_year(season: &str, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let (first_month, last_year, last_month) = match season {
        "spring" => (3, year, 5),
        "summer" => (6, year, 8),
        "fall" | "autumn" => (9, year, 11),
        "winter" => (12, year + 1, 2),
        _ => return None,
    };
    let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
    let end = end_of_month(NaiveDate::from_ymd_opt(last_year, last_month, 1)?);
    Some((start, end))
}

pub(super) fn extract(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let season = caps.name("season")?.as_str().to_lowercase();
    let reference = ctx.reference;

    let explicit = caps.name("year1").or_else(|| caps.name("year2"));
    let (start, end) = match explicit {
        Some(year) => season_of_year(&season, year.as_str().parse().ok()?)?,
        None => {
            // Latest occurrence that has already begun
            let mut year = reference.year();
            let mut range = season_of_year(&season, year)?;
            if reference < range.0 {
                year -= 1;
                range = season_of_year(&season, year)?;
            }
            let count = caps
                .name("last")
                .map(|m| qualifier_words(m.as_str()).len() as i32)
                .unwrap_or(0);
            if count > 0 {
                // A season still in progress is "this" season, so "last"
                // needs one more step back than a finished one.
                let back = if reference < range.1 { count } else { count - 1 };
                range = season_of_year(&season, year - back)?;
            }
            range
        }
    };

    let mut result = ParsedResult::from_match(whole, reference, Tag::Season);
    result.start = ParsedComponents::from_date(start, Certainty::Certain, reference);
    result.end = Some(ParsedComponents::from_date(end, Certainty::Certain, reference));
    Some(result)
}
