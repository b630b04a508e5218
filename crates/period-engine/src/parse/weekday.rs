//! Weekday names.
//!
//! Two grammars live here. The speech grammar reads a bare weekday as the
//! most recent one, which is what "how did I sleep on tuesday" means in a
//! log of past data. The generic detector resolves a bare weekday to the
//! closest occurrence in either direction and honours "next".

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::{Captures, Regex};

use super::result::{Certainty, Field, ParsedResult, Tag};
use super::vocab::{parse_weekday, qualifier_words, SPOKEN_WEEKDAYS, WEEKDAYS};
use super::{cached_pattern, MatchContext};
use crate::period::{days_from_week_start, start_of_week, weekday_on_or_before, WeekStartDay};

// ── Speech grammar ──────────────────────────────────────────────────────────

pub(super) fn speech_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(
            r"\b(?:on\s+)?(?P<prefix>(?:(?:this|last|past|next),?\s+)+)?(?P<dow>{SPOKEN_WEEKDAYS})\b(?:\s+(?:of|in|on)\s+(?:the\s+)?(?P<suffix>(?:(?:this|last|past|next),?\s+)+)week\b)?"
        )
    })
}

/// The `weekday` in the week starting `weeks` weeks after the reference's.
fn in_week(reference: NaiveDate, weekday: Weekday, weeks: i64, week_start: WeekStartDay) -> NaiveDate {
    start_of_week(reference, week_start)
        + Duration::weeks(weeks)
        + Duration::days(days_from_week_start(weekday, week_start))
}

pub(super) fn extract_speech(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let weekday = parse_weekday(caps.name("dow")?.as_str())?;
    let reference = ctx.reference;
    let week_start = ctx.options.week_start;

    let words = caps
        .name("prefix")
        .or_else(|| caps.name("suffix"))
        .map(|m| qualifier_words(m.as_str()))
        .unwrap_or_default();

    let (date, certainty) = match words.last().map(String::as_str) {
        None => (weekday_on_or_before(reference, weekday), Certainty::Implied),
        Some("past") if words.len() == 1 => {
            (weekday_on_or_before(reference, weekday), Certainty::Certain)
        }
        Some("this") => (in_week(reference, weekday, 0, week_start), Certainty::Certain),
        Some("next") => (in_week(reference, weekday, 1, week_start), Certainty::Certain),
        Some(_) => {
            let back = words.len() as i64;
            (in_week(reference, weekday, -back, week_start), Certainty::Certain)
        }
    };

    let mut result = ParsedResult::from_match(whole, reference, Tag::Weekday);
    result.start.set_date(date, certainty);
    result
        .start
        .assign(Field::Weekday, weekday.num_days_from_sunday() as i32);
    Some(result)
}

// ── Nearest-occurrence detector ─────────────────────────────────────────────

pub(super) fn nearest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(r"\b(?:(?P<modifier>next|last|this)\s+)?(?P<dow>{WEEKDAYS})\b")
    })
}

pub(super) fn extract_nearest(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let weekday = parse_weekday(caps.name("dow")?.as_str())?;
    let reference = ctx.reference;
    let current = reference.weekday();
    let ahead = (weekday.num_days_from_monday() as i64 - current.num_days_from_monday() as i64
        + 7)
        % 7;

    let modifier = caps.name("modifier").map(|m| m.as_str().to_lowercase());
    let (date, certainty) = match modifier.as_deref() {
        // Always future: the same weekday as today means next week
        Some("next") => {
            let ahead = if ahead == 0 { 7 } else { ahead };
            (reference + Duration::days(ahead), Certainty::Certain)
        }
        // Always past: the same weekday as today means last week
        Some("last") => {
            let back = if ahead == 0 { 7 } else { 7 - ahead };
            (reference - Duration::days(back), Certainty::Certain)
        }
        Some(_) => (
            in_week(reference, weekday, 0, ctx.options.week_start),
            Certainty::Certain,
        ),
        None if ahead <= 3 => (reference + Duration::days(ahead), Certainty::Implied),
        None => (reference - Duration::days(7 - ahead), Certainty::Implied),
    };

    let mut result = ParsedResult::from_match(whole, reference, Tag::NearestWeekday);
    result.start.set_date(date, certainty);
    result
        .start
        .assign(Field::Weekday, weekday.num_days_from_sunday() as i32);
    Some(result)
}
