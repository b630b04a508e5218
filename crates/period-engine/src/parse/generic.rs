//! Written-date grammar shared by both presets.

use std::sync::OnceLock;

use chrono::Duration;
use regex::{Captures, Regex};

use super::month_name::nearest_past_year;
use super::result::{Certainty, Field, ParsedComponents, ParsedResult, Tag};
use super::vocab::{parse_month, MONTHS};
use super::{cached_pattern, MatchContext};

// ── ISO dates ───────────────────────────────────────────────────────────────

pub(super) fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"\b(?P<year>\d{4})[-/](?P<month>\d{1,2})[-/](?P<day>\d{1,2})\b".to_string()
    })
}

pub(super) fn extract_iso_date(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let number = |name: &str| caps.name(name)?.as_str().parse::<i32>().ok();

    let mut result = ParsedResult::from_match(whole, ctx.reference, Tag::IsoDate);
    result.start.assign(Field::Year, number("year")?);
    result.start.assign(Field::Month, number("month")?);
    result.start.assign(Field::Day, number("day")?);
    result.start.is_valid().then_some(result)
}

// ── Month and day ───────────────────────────────────────────────────────────

const ORDINAL_SUFFIX: &str = "(?:st|nd|rd|th)?";

pub(super) fn month_day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(
            r"\b(?P<month>{MONTHS})\b\.?\s+(?:the\s+)?(?P<day>\d{{1,2}}){ORDINAL_SUFFIX}\b(?:,?\s+(?P<year>[12]\d{{3}})\b)?"
        )
    })
}

pub(super) fn day_month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        format!(
            r"\b(?:the\s+)?(?P<day>\d{{1,2}}){ORDINAL_SUFFIX}\s+(?:of\s+)?(?P<month>{MONTHS})\b\.?(?:,?\s+(?P<year>[12]\d{{3}})\b)?"
        )
    })
}

/// Either order: month and day certain, the year certain when given and
/// otherwise the latest one in which that day has already happened.
pub(super) fn extract_month_day(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let month = parse_month(caps.name("month")?.as_str())?;
    let day: u32 = caps.name("day")?.as_str().parse().ok()?;

    let mut result = ParsedResult::from_match(whole, ctx.reference, Tag::MonthDay);
    result.start.assign(Field::Month, month as i32);
    result.start.assign(Field::Day, day as i32);
    match caps.name("year") {
        Some(year) => result.start.assign(Field::Year, year.as_str().parse().ok()?),
        None => result
            .start
            .imply(Field::Year, nearest_past_year(month, Some(day), ctx.reference)?),
    }
    result.start.is_valid().then_some(result)
}

// ── Years ───────────────────────────────────────────────────────────────────

pub(super) fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"\b(?:(?:the\s+)?year\s+(?:of\s+)?)?(?P<year>19\d{2}|20\d{2})\b".to_string()
    })
}

pub(super) fn extract_year(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let mut result = ParsedResult::from_match(whole, ctx.reference, Tag::Year);
    result.start.assign(Field::Year, caps.name("year")?.as_str().parse().ok()?);
    result.start.imply(Field::Month, 1);
    result.start.imply(Field::Day, 1);
    Some(result)
}

// ── Casual words ────────────────────────────────────────────────────────────

pub(super) fn casual_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"\b(?P<word>today|tonight|yesterday|tomorrow|last\s+night)\b".to_string()
    })
}

pub(super) fn extract_casual(caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
    let whole = caps.get(0)?;
    let word = caps.name("word")?.as_str().to_lowercase();
    let offset = match word.as_str() {
        "yesterday" => -1,
        "tomorrow" => 1,
        w if w.starts_with("last") => -1,
        _ => 0,
    };
    let reference = ctx.reference;
    let date = reference.checked_add_signed(Duration::days(offset))?;

    let mut result = ParsedResult::from_match(whole, reference, Tag::Casual);
    result.start = ParsedComponents::from_date(date, Certainty::Certain, reference);
    Some(result)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::parse::{Parser, Tag, TemporalParser};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
    }

    fn single(parser: Parser, text: &str) -> u32 {
        let results = TemporalParser::builder().parser(parser).build().parse(text, reference());
        assert_eq!(results.len(), 1, "{text}");
        results[0].to_range().unwrap().start.value()
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(single(Parser::IsoDate, "on 2019-07-04"), 20190704);
        assert_eq!(single(Parser::IsoDate, "2019/7/4"), 20190704);
        let parser = TemporalParser::builder().parser(Parser::IsoDate).build();
        assert!(parser.parse("2019-02-30", reference()).is_empty());
    }

    #[test]
    fn test_month_day_nearest_past() {
        let expected = [
            ("january 1", 20200101),
            ("january 15", 20200115),
            ("february 1", 20200201),
            ("march 1", 20200301),
            ("march 5", 20190305),
            ("may 1", 20190501),
            ("december 1st", 20191201),
        ];
        for (text, date) in expected {
            assert_eq!(single(Parser::MonthDay, text), date, "{text}");
        }
    }

    #[test]
    fn test_month_day_with_year() {
        assert_eq!(single(Parser::MonthDay, "March 5th, 2018"), 20180305);
        assert!(TemporalParser::builder()
            .parser(Parser::MonthDay)
            .build()
            .parse("february 30", reference())
            .is_empty());
    }

    #[test]
    fn test_day_month() {
        assert_eq!(single(Parser::DayMonth, "the 5th of march"), 20190305);
        assert_eq!(single(Parser::DayMonth, "5 March 2018"), 20180305);
    }

    #[test]
    fn test_years() {
        assert_eq!(single(Parser::Year, "2019"), 20190101);
        assert_eq!(single(Parser::Year, "year 2020"), 20200101);
        let parser = TemporalParser::builder().parser(Parser::Year).build();
        assert!(parser.parse("12019", reference()).is_empty());
        let result = &parser.parse("in 2019", reference())[0];
        assert!(result.has_tag(Tag::Year));
        assert_eq!(result.to_range().unwrap().end.value(), 20191231);
    }

    #[test]
    fn test_casual_words() {
        assert_eq!(single(Parser::Casual, "today"), 20200301);
        assert_eq!(single(Parser::Casual, "Yesterday"), 20200229);
        assert_eq!(single(Parser::Casual, "tomorrow"), 20200302);
        assert_eq!(single(Parser::Casual, "last night"), 20200229);
    }
}
