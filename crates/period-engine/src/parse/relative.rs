//! Periods relative to the reference day: "last week", "this month",
//! "past 10 days".

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use super::result::{Certainty, Field, ParsedComponents, ParsedResult, Tag};
use super::vocab::{parse_count, qualifier_words, NUMBER_WORDS};
use super::{cached_pattern, MatchContext};
use crate::period::{add_days, add_months, add_weeks, start_of_month, start_of_week};

pub(super) fn period_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"\b(?P<qualifiers>(?:(?:last|lost|past|recent|this|current|present),?\s+)+)(?P<unit>week|month|year)\b"
            .to_string()
    })
}

pub(super) fn recent_days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(r"\b(?:last|past|recent|resent)\s+(?P<count>\d+|{NUMBER_WORDS})\s+days?\b")
    })
}

/// How many periods back from the current one the qualifiers point.
///
/// A run of "last" (or its mishearing "lost") counts one period per word.
/// Any other run resolves to the current period when it ends in
/// "this"/"current"/"present", and to the previous period otherwise.
fn period_shift(words: &[String]) -> i64 {
    if !words.is_empty() && words.iter().all(|w| w == "last" || w == "lost") {
        return -(words.len() as i64);
    }
    match words.last().map(String::as_str) {
        Some("this" | "current" | "present") => 0,
        _ => -1,
    }
}

pub(super) fn extract_period(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let shift = period_shift(&qualifier_words(caps.name("qualifiers")?.as_str()));
    let reference = ctx.reference;

    let mut result = ParsedResult::from_match(whole, reference, Tag::RelativePeriod);
    match caps.name("unit")?.as_str().to_lowercase().as_str() {
        "week" => {
            let start = add_weeks(start_of_week(reference, ctx.options.week_start), shift)?;
            let end = add_days(start, 6)?;
            result.start = ParsedComponents::from_date(start, Certainty::Certain, reference);
            result.end = Some(ParsedComponents::from_date(end, Certainty::Certain, reference));
        }
        "month" => {
            let start = start_of_month(add_months(reference, i32::try_from(shift).ok()?)?);
            result.start.assign(Field::Year, start.year());
            result.start.assign(Field::Month, start.month() as i32);
            result.start.imply(Field::Day, 1);
        }
        _ => {
            result.start.assign(Field::Year, reference.year() + i32::try_from(shift).ok()?);
            result.start.imply(Field::Month, 1);
            result.start.imply(Field::Day, 1);
        }
    }
    Some(result)
}

/// "last N days" ends on the reference day and includes it.
pub(super) fn extract_recent_days(
    caps: &Captures<'_>,
    ctx: &MatchContext<'_>,
) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let count = parse_count(caps.name("count")?.as_str())?;
    if count == 0 {
        return None;
    }
    let reference = ctx.reference;
    let start: NaiveDate = add_days(reference, -(i64::from(count) - 1))?;

    let mut result = ParsedResult::from_match(whole, reference, Tag::RecentDays);
    result.start = ParsedComponents::from_date(start, Certainty::Certain, reference);
    result.end = Some(ParsedComponents::from_date(reference, Certainty::Certain, reference));
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, Parser, TemporalParser};
    use crate::period::WeekStartDay;
    use crate::IntegerDate;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
    }

    fn range(text: &str, options: ParseOptions) -> (u32, u32) {
        let parser = TemporalParser::builder()
            .parsers([Parser::RelativePeriod, Parser::RecentDays])
            .options(options)
            .build();
        let results = parser.parse(text, reference());
        assert_eq!(results.len(), 1, "{text}");
        let range = results[0].to_range().unwrap();
        (range.start.value(), range.end.value())
    }

    #[test]
    fn test_period_shift() {
        let words = |s: &str| qualifier_words(s);
        assert_eq!(period_shift(&words("last")), -1);
        assert_eq!(period_shift(&words("last last")), -2);
        assert_eq!(period_shift(&words("lost last")), -2);
        assert_eq!(period_shift(&words("this")), 0);
        assert_eq!(period_shift(&words("past")), -1);
        assert_eq!(period_shift(&words("past current")), 0);
        assert_eq!(period_shift(&words("recent")), -1);
    }

    #[test]
    fn test_relative_periods() {
        let o = ParseOptions::default;
        assert_eq!(range("this month", o()), (20200301, 20200331));
        assert_eq!(range("last month", o()), (20200201, 20200229));
        assert_eq!(range("last last month", o()), (20200101, 20200131));
        assert_eq!(range("this week", o()), (20200224, 20200301));
        assert_eq!(range("last week", o()), (20200217, 20200223));
        assert_eq!(range("last last week", o()), (20200210, 20200216));
        assert_eq!(range("this year", o()), (20200101, 20201231));
        assert_eq!(range("lost year", o()), (20190101, 20191231));
    }

    #[test]
    fn test_sunday_week_start() {
        let options = ParseOptions {
            week_start: WeekStartDay::Sunday,
            ..ParseOptions::default()
        };
        assert_eq!(range("this week", options), (20200301, 20200307));
    }

    #[test]
    fn test_recent_days() {
        let o = ParseOptions::default;
        assert_eq!(range("recent 10 days", o()), (20200221, 20200301));
        assert_eq!(range("resent 10 days", o()), (20200221, 20200301));
        assert_eq!(range("past 10 days", o()), (20200221, 20200301));
        assert_eq!(range("last seven days", o()), (20200224, 20200301));
        assert_eq!(range("last 1 day", o()), (20200301, 20200301));
    }

    #[test]
    fn test_zero_days_is_rejected() {
        let parser = TemporalParser::builder().parser(Parser::RecentDays).build();
        assert!(parser.parse("last 0 days", reference()).is_empty());
    }

    #[test]
    fn test_week_result_is_day_certain() {
        let parser = TemporalParser::builder().parser(Parser::RelativePeriod).build();
        let result = &parser.parse("last week", reference())[0];
        assert!(result.start.is_certain(Field::Day));
        assert_eq!(
            IntegerDate::from_date(result.end_date().unwrap()).unwrap(),
            IntegerDate::new(20200223).unwrap()
        );
    }
}
