//! Whole-sentence checks of the speech grammar against a fixed day
//! (Sunday 2020-03-01).

use chrono::NaiveDate;
use period_engine::{classify_range, PeriodKind, Tag, TemporalParser};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
}

fn ranges(text: &str) -> Vec<(u32, u32)> {
    TemporalParser::speech()
        .parse(text, today())
        .iter()
        .map(|result| {
            let range = result.to_range().unwrap();
            (range.start.value(), range.end.value())
        })
        .collect()
}

#[test]
fn sentences_resolve_to_ranges() {
    let cases = [
        ("how many steps did I take last week", (20200217, 20200223)),
        ("show my sleep this month", (20200301, 20200331)),
        ("heart rate over the last 7 days", (20200224, 20200301)),
        ("what did I do on friday", (20200228, 20200228)),
        ("show me march 5th", (20190305, 20190305)),
        ("weight in spring 2017", (20170301, 20170531)),
        ("steps for january 2019", (20190101, 20190131)),
        ("what happened during thanksgiving", (20191128, 20191128)),
        ("calories on christmas", (20191225, 20191225)),
        ("show my sleep from last monday to this wednesday", (20200217, 20200226)),
        ("heart rate since last summer", (20190601, 20200301)),
        ("workouts from november to march", (20191101, 20200331)),
    ];
    for (text, expected) in cases {
        assert_eq!(ranges(text), vec![expected], "{text}");
    }
}

#[test]
fn separate_expressions_stay_separate() {
    assert_eq!(
        ranges("compare january and february"),
        vec![(20200101, 20200131), (20200201, 20200229)]
    );
}

#[test]
fn sentence_without_dates_yields_nothing() {
    assert!(ranges("how did I sleep").is_empty());
    assert!(ranges("").is_empty());
}

#[test]
fn merged_range_keeps_source_text() {
    let results = TemporalParser::speech().parse("steps from february 1 to march 10", today());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].text, "february 1 to march 10");
    assert!(results[0].has_tag(Tag::MergedRange));
    assert!(results[0].has_tag(Tag::MonthDay));
}

#[test]
fn parsed_periods_classify_relative_to_today() {
    let results = TemporalParser::speech().parse("last year", today());
    let range = results[0].to_range().unwrap();
    let semantic = classify_range(range.start, range.end, today()).unwrap();
    assert_eq!(semantic.kind, PeriodKind::Year);
    assert_eq!(semantic.phrase(), "last year");
}
