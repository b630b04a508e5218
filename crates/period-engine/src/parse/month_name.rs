//! Month names with optional qualifiers and year.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Match, Regex};

use super::result::{Field, ParsedResult, Tag};
use super::vocab::{parse_month, qualifier_words, MONTHS};
use super::{cached_pattern, MatchContext};
use crate::period::end_of_month;

const QUALIFIERS: &str = "this|next|last|lost|past";

pub(super) fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(
            r"\b(?:(?P<prefix>(?:(?:{QUALIFIERS}),?\s+)+))?(?P<month>{MONTHS})\b\.?(?:\s+(?:of|in)\s+(?:the\s+)?(?P<suffix>(?:(?:{QUALIFIERS}),?\s+)+)year\b)?(?:,?\s+(?:of\s+|in\s+)?(?P<year>[12]\d:?\d{{2}}|'\d{{2}})(?:\s*(?P<era>BE|BC|AD)\b)?\b)?"
        )
    })
}

pub(super) fn extract(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let month = parse_month(caps.name("month")?.as_str())?;
    let reference = ctx.reference;

    let mut result = ParsedResult::from_match(whole, reference, Tag::MonthName);
    result.start.assign(Field::Month, month as i32);
    result.start.imply(Field::Day, 1);

    if let Some(year) = caps.name("year") {
        let year = explicit_year(year.as_str(), caps.name("era"))?;
        result.start.assign(Field::Year, year);
    } else if let Some(run) = caps.name("prefix").or_else(|| caps.name("suffix")) {
        let words = qualifier_words(run.as_str());
        result.start.assign(Field::Year, qualified_year(&words, month, reference)?);
    } else {
        result.start.imply(Field::Year, nearest_past_year(month, None, reference)?);
    }
    Some(result)
}

/// A spelled-out year: "2019", "20:19" (dictated), "'19", with an optional
/// era marker.
pub(super) fn explicit_year(text: &str, era: Option<Match<'_>>) -> Option<i32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let mut year: i32 = digits.parse().ok()?;
    if digits.len() <= 2 {
        year += 2000;
    }
    match era.map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
        Some("BE") => year -= 543,
        Some("BC") => year = -year,
        _ => {}
    }
    Some(year)
}

/// "last march", "past past march", "this march", "march of next year".
///
/// A lone "this" or "next" keeps the reference year. Any other run steps
/// back from the end of that month: one year if it has not finished by the
/// reference, then one more year per extra qualifier word.
fn qualified_year(words: &[String], month: u32, reference: NaiveDate) -> Option<i32> {
    if let [word] = words {
        if word == "this" || word == "next" {
            return Some(reference.year());
        }
    }
    let pivot = end_of_month(NaiveDate::from_ymd_opt(reference.year(), month, 1)?);
    let mut year = pivot.year();
    if pivot > reference {
        year -= 1;
    }
    Some(year - (words.len() as i32 - 1))
}

/// The latest year in which `month` (and `day`, if given) has already begun
/// by `reference`.
///
/// Without a day this is the reference year or the one before. With a day
/// that does not exist in those years (February 29) earlier years are tried.
pub(super) fn nearest_past_year(month: u32, day: Option<u32>, reference: NaiveDate) -> Option<i32> {
    let day = day.unwrap_or(1);
    (0..8)
        .map(|back| reference.year() - back)
        .find(|year| NaiveDate::from_ymd_opt(*year, month, day).is_some_and(|date| date <= reference))
}
