//! Post-processing of parsed candidates.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use tracing::debug;

use super::result::{Certainty, Field, ParsedComponents, ParsedResult, Tag};
use super::{cached_pattern, MatchContext};
use crate::period::add_years;

// ── Range merging ───────────────────────────────────────────────────────────

/// Text allowed between the two halves of "X to Y". Speech recognisers
/// regularly hear "to" as "two" or "2".
fn connector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || {
        r"^[,.]?\s*(?:to|through|thru|till|until|two|2|-)\s*$".to_string()
    })
}

fn joined_by_connector(text: &str, from: &ParsedResult, to: &ParsedResult) -> bool {
    text.get(from.end_index()..to.index)
        .is_some_and(|between| connector_pattern().is_match(between))
}

/// Merge every pair of adjacent end-less results joined by a connector.
pub(super) fn merge_ranges(text: &str, results: Vec<ParsedResult>) -> Vec<ParsedResult> {
    if results.len() < 2 {
        return results;
    }

    let mut merged = Vec::with_capacity(results.len());
    let mut iter = results.into_iter().peekable();
    while let Some(current) = iter.next() {
        if current.end.is_some() {
            merged.push(current);
            continue;
        }
        match iter.next_if(|next| next.end.is_none() && joined_by_connector(text, &current, next)) {
            Some(next) => merged.push(merge_pair(text, current, next)),
            None => merged.push(current),
        }
    }
    merged
}

fn merge_pair(text: &str, mut from: ParsedResult, mut to: ParsedResult) -> ParsedResult {
    if !from.is_only_weekday() && !to.is_only_weekday() {
        for (field, value) in to.start.certain_date_fields() {
            if !from.start.is_certain(field) {
                from.start.assign(field, value);
            }
        }
        for (field, value) in from.start.certain_date_fields() {
            if !to.start.is_certain(field) {
                to.start.assign(field, value);
            }
        }
    }

    let from_date = from.start.date();
    let to_date = to.start.date();
    if from_date > to_date {
        let week = Duration::weeks(1);
        if from.is_only_weekday() && from_date - week < to_date {
            from.start.set_date(from_date - week, Certainty::Implied);
        } else if to.is_only_weekday() && to_date + week > from_date {
            to.start.set_date(to_date + week, Certainty::Implied);
        } else if !to.start.is_certain(Field::Year) {
            roll_forward(&mut to.start, from_date);
        } else {
            debug!(from = %from.text, to = %to.text, "swapping inverted range");
            std::mem::swap(&mut from, &mut to);
        }
    }

    let index = from.index.min(to.index);
    let end_index = from.end_index().max(to.end_index());
    from.tags.extend(to.tags.iter().copied());
    from.tags.insert(Tag::MergedRange);
    from.index = index;
    from.text = text.get(index..end_index).unwrap_or(&from.text).to_string();
    from.end = Some(to.start);
    from
}

/// Move an endpoint whose year was only implied forward by whole years until
/// it is no earlier than `not_before`.
fn roll_forward(end: &mut ParsedComponents, not_before: NaiveDate) {
    let mut date = end.date();
    while date < not_before {
        match add_years(date, 1) {
            Some(next) => date = next,
            None => return,
        }
    }
    for (field, value) in [
        (Field::Month, date.month() as i32),
        (Field::Day, date.day() as i32),
    ] {
        if end.is_certain(field) {
            end.assign(field, value);
        } else {
            end.imply(field, value);
        }
    }
    end.imply(Field::Year, date.year());
}

// ── Since / around ──────────────────────────────────────────────────────────

/// Where `pattern` matches the text just before `result`, the byte offset the
/// match starts at.
fn preceded_by(pattern: &Regex, text: &str, result: &ParsedResult) -> Option<usize> {
    let before = text.get(..result.index)?;
    pattern.find(before).map(|m| m.start())
}

fn since_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || r"\bsince\s+$".to_string())
}

fn around_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached_pattern(&PATTERN, || r"\b(?:around|near)\s+$".to_string())
}

/// "since X": a lone result now ends on the reference day.
pub(super) fn since(
    text: &str,
    mut results: Vec<ParsedResult>,
    ctx: &MatchContext<'_>,
) -> Vec<ParsedResult> {
    if results.len() != 1 {
        return results;
    }
    let Some(index) = preceded_by(since_pattern(), text, &results[0]) else {
        return results;
    };
    let result = &mut results[0];
    extend_leftwards(text, result, index);
    result.end = Some(ParsedComponents::from_date(
        ctx.reference,
        Certainty::Certain,
        ctx.reference,
    ));
    result.tags.insert(Tag::Since);
    results
}

/// "around X": a lone day becomes the window of `around_radius_days` on
/// either side of it.
pub(super) fn around(
    text: &str,
    mut results: Vec<ParsedResult>,
    ctx: &MatchContext<'_>,
) -> Vec<ParsedResult> {
    let [candidate] = results.as_slice() else {
        return results;
    };
    let day_certain =
        candidate.start.is_certain(Field::Day) || candidate.start.is_certain(Field::Weekday);
    if candidate.end.is_some() || !day_certain {
        return results;
    }
    let Some(index) = preceded_by(around_pattern(), text, candidate) else {
        return results;
    };

    let pivot = candidate.start.date();
    let radius = Duration::days(i64::from(ctx.options.around_radius_days));
    let (Some(start), Some(end)) = (
        pivot.checked_sub_signed(radius),
        pivot.checked_add_signed(radius),
    ) else {
        return results;
    };
    let result = &mut results[0];
    extend_leftwards(text, result, index);
    result.start = ParsedComponents::from_date(start, Certainty::Certain, ctx.reference);
    result.end = Some(ParsedComponents::from_date(end, Certainty::Certain, ctx.reference));
    result.tags.insert(Tag::Around);
    results
}

fn extend_leftwards(text: &str, result: &mut ParsedResult, index: usize) {
    if let Some(extended) = text.get(index..result.end_index()) {
        result.text = extended.to_string();
        result.index = index;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::parse::{ParseOptions, Parser, Refiner, Tag, TemporalParser};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
    }

    fn speech_range(text: &str) -> (u32, u32) {
        let results = TemporalParser::speech().parse(text, reference());
        assert_eq!(results.len(), 1, "{text}: {results:?}");
        let range = results[0].to_range().unwrap();
        (range.start.value(), range.end.value())
    }

    #[test]
    fn test_merge_month_days() {
        assert_eq!(speech_range("from February 1 to March 10"), (20200201, 20200310));
        assert_eq!(speech_range("from February 1 through March 10"), (20200201, 20200310));
        assert_eq!(speech_range("from February 1 two March 10"), (20200201, 20200310));
        assert_eq!(speech_range("from October 10 to January 20"), (20191010, 20200120));
        assert_eq!(speech_range("december 12th, two december 16th"), (20191212, 20191216));
    }

    #[test]
    fn test_merge_months_rolls_implied_year() {
        assert_eq!(speech_range("from February to April"), (20200201, 20200430));
        assert_eq!(speech_range("from November to March"), (20191101, 20200331));
    }

    #[test]
    fn test_merge_weekdays_moves_by_a_week() {
        assert_eq!(speech_range("from Sunday to Thursday"), (20200223, 20200227));
        assert_eq!(speech_range("from Thursday to Tuesday"), (20200220, 20200225));
        assert_eq!(speech_range("from Monday to Wednesday"), (20200224, 20200226));
        assert_eq!(speech_range("from last Monday to this Wednesday"), (20200217, 20200226));
    }

    #[test]
    fn test_merge_years() {
        assert_eq!(speech_range("from 2019 to 2020"), (20190101, 20201231));
    }

    #[test]
    fn test_merge_swaps_explicit_inversion() {
        let results = TemporalParser::generic().parse("2020-03-10 - 2020-03-01", reference());
        assert_eq!(results.len(), 1);
        let range = results[0].to_range().unwrap();
        assert_eq!((range.start.value(), range.end.value()), (20200301, 20200310));
        assert!(results[0].has_tag(Tag::MergedRange));
        assert_eq!(results[0].text, "2020-03-10 - 2020-03-01");
    }

    #[test]
    fn test_unrelated_results_are_not_merged() {
        let results = TemporalParser::speech().parse("march and april", reference());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_since() {
        assert_eq!(speech_range("since march"), (20200301, 20200301));
        assert_eq!(speech_range("since last summer"), (20190601, 20200301));
        assert_eq!(speech_range("since winter"), (20191201, 20200301));
        assert_eq!(speech_range("since january 15"), (20200115, 20200301));
        let results = TemporalParser::speech().parse("steps since january", reference());
        assert_eq!(results[0].text, "since january");
        assert!(results[0].has_tag(Tag::Since));
    }

    #[test]
    fn test_around() {
        assert_eq!(speech_range("around february 10"), (20200207, 20200213));
        // Month-level results are left alone
        let results = TemporalParser::speech().parse("around february", reference());
        assert!(results[0].end.is_none());
    }

    #[test]
    fn test_around_radius_option() {
        let parser = TemporalParser::builder()
            .parser(Parser::MonthDay)
            .refiner(Refiner::Around)
            .options(ParseOptions {
                around_radius_days: 1,
                ..ParseOptions::default()
            })
            .build();
        let results = parser.parse("near february 10", reference());
        let range = results[0].to_range().unwrap();
        assert_eq!((range.start.value(), range.end.value()), (20200209, 20200211));
    }
}
