//! Natural-language date extraction.
//!
//! A [`TemporalParser`] is an ordered list of [`Parser`]s and an ordered list
//! of [`Refiner`]s. Parsing runs every parser's pattern over the text, drops
//! candidates that overlap a longer one, and then lets each refiner rewrite
//! the surviving list (merging "X to Y" into a range, extending "since X" up
//! to the reference day, and so on).
//!
//! Two presets are provided: [`TemporalParser::generic`] for ordinary date
//! expressions and [`TemporalParser::speech`] for transcribed voice commands,
//! which adds the relative-period, season and holiday grammars and replaces
//! the generic weekday detector with one tuned for past-oriented queries.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use period_engine::{IntegerDate, TemporalParser};
//!
//! let parser = TemporalParser::speech();
//! let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
//!
//! let results = parser.parse("show my steps for last week", today);
//! assert_eq!(results.len(), 1);
//!
//! let range = results[0].to_range().unwrap();
//! assert_eq!(range.start, IntegerDate::new(20200217).unwrap());
//! assert_eq!(range.end, IntegerDate::new(20200223).unwrap());
//! ```

mod generic;
mod holiday;
mod month_name;
mod refine;
mod relative;
mod result;
mod season;
mod vocab;
mod weekday;

use std::ops::Range;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{EngineError, Result};
use crate::period::WeekStartDay;

pub use result::{Certainty, Component, Field, Granularity, ParsedComponents, ParsedResult, Tag};

// ── Options ─────────────────────────────────────────────────────────────────

/// Settings shared by every parser and refiner of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// First day of the week for "this week", "last monday" and friends.
    pub week_start: WeekStartDay,
    /// Half-width of the window produced by "around X".
    pub around_radius_days: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStartDay::Monday,
            around_radius_days: 3,
        }
    }
}

/// Everything an extraction needs besides the match itself.
pub(crate) struct MatchContext<'a> {
    pub reference: NaiveDate,
    pub options: &'a ParseOptions,
}

/// Compile a built-in, case-insensitive pattern once per process.
pub(crate) fn cached_pattern(
    cell: &'static OnceLock<Regex>,
    pattern: impl FnOnce() -> String,
) -> &'static Regex {
    cell.get_or_init(|| {
        RegexBuilder::new(&pattern())
            .case_insensitive(true)
            .build()
            .expect("built-in date pattern compiles")
    })
}

// ── Parsers ─────────────────────────────────────────────────────────────────

/// One grammar recognised by a [`TemporalParser`].
#[derive(Debug, Clone)]
pub enum Parser {
    /// Blanks every region the pattern matches for all parsers placed after
    /// it, and yields nothing itself.
    Suppress(Regex),
    /// "March", "last march", "january of last year", "may 2019".
    MonthName,
    /// "this week", "last last month", "past year".
    RelativePeriod,
    /// "monday", "last sunday", "this friday", "wednesday of next week".
    Weekday,
    /// "spring", "last winter", "fall of 2017".
    Season,
    /// US holidays: "thanksgiving", "easter 2018", "mother's day".
    Holiday,
    /// "last 10 days", "past seven days".
    RecentDays,
    /// "2020-03-01", "2020/3/1".
    IsoDate,
    /// "March 5", "march 5th, 2019".
    MonthDay,
    /// "5 March", "5th of march 2019".
    DayMonth,
    /// "2019", "year 2020".
    Year,
    /// "today", "yesterday", "tomorrow".
    Casual,
    /// "friday", "next friday", "last friday" resolved to the nearest
    /// occurrence in the stated direction.
    NearestWeekday,
}

impl Parser {
    /// A suppressing parser for `pattern` (matched case-insensitively).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn suppress(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Parser::Suppress)
            .map_err(|e| EngineError::InvalidPattern(e.to_string()))
    }

    /// A suppressing parser that blanks the whole text for everything after
    /// it.
    pub fn suppress_all() -> Self {
        static ALL: OnceLock<Regex> = OnceLock::new();
        Parser::Suppress(cached_pattern(&ALL, || r"(?s).+".to_string()).clone())
    }

    fn pattern(&self) -> &Regex {
        match self {
            Parser::Suppress(re) => re,
            Parser::MonthName => month_name::pattern(),
            Parser::RelativePeriod => relative::period_pattern(),
            Parser::Weekday => weekday::speech_pattern(),
            Parser::Season => season::pattern(),
            Parser::Holiday => holiday::pattern(),
            Parser::RecentDays => relative::recent_days_pattern(),
            Parser::IsoDate => generic::iso_date_pattern(),
            Parser::MonthDay => generic::month_day_pattern(),
            Parser::DayMonth => generic::day_month_pattern(),
            Parser::Year => generic::year_pattern(),
            Parser::Casual => generic::casual_pattern(),
            Parser::NearestWeekday => weekday::nearest_pattern(),
        }
    }

    fn extract(&self, caps: &Captures<'_>, ctx: &MatchContext<'_>) -> Option<ParsedResult> {
        match self {
            Parser::Suppress(_) => None,
            Parser::MonthName => month_name::extract(caps, ctx),
            Parser::RelativePeriod => relative::extract_period(caps, ctx),
            Parser::Weekday => weekday::extract_speech(caps, ctx),
            Parser::Season => season::extract(caps, ctx),
            Parser::Holiday => holiday::extract(caps, ctx),
            Parser::RecentDays => relative::extract_recent_days(caps, ctx),
            Parser::IsoDate => generic::extract_iso_date(caps, ctx),
            Parser::MonthDay => generic::extract_month_day(caps, ctx),
            Parser::DayMonth => generic::extract_month_day(caps, ctx),
            Parser::Year => generic::extract_year(caps, ctx),
            Parser::Casual => generic::extract_casual(caps, ctx),
            Parser::NearestWeekday => weekday::extract_nearest(caps, ctx),
        }
    }
}

// ── Refiners ────────────────────────────────────────────────────────────────

/// A rewrite applied to the candidate list after overlap removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Refiner {
    /// "X to Y": merge two adjacent results into one range.
    MergeRange,
    /// "since X": extend a lone result through the reference day.
    Since,
    /// "around X": widen a lone day into a window around it.
    Around,
}

impl Refiner {
    fn refine(
        self,
        text: &str,
        results: Vec<ParsedResult>,
        ctx: &MatchContext<'_>,
    ) -> Vec<ParsedResult> {
        match self {
            Refiner::MergeRange => refine::merge_ranges(text, results),
            Refiner::Since => refine::since(text, results, ctx),
            Refiner::Around => refine::around(text, results, ctx),
        }
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────────

/// An ordered pipeline of parsers and refiners.
#[derive(Debug, Clone, Default)]
pub struct TemporalParser {
    parsers: Vec<Parser>,
    refiners: Vec<Refiner>,
    options: ParseOptions,
}

impl TemporalParser {
    pub fn builder() -> TemporalParserBuilder {
        TemporalParserBuilder::default()
    }

    /// Ordinary written dates: ISO dates, month/day pairs, years, casual
    /// words and weekdays, with "X to Y" merging.
    pub fn generic() -> Self {
        Self::builder()
            .parsers(generic_parsers())
            .refiner(Refiner::MergeRange)
            .build()
    }

    /// The grammar for transcribed voice queries.
    ///
    /// Speech parsers run first, then a suppressing parser hides weekday words
    /// from the generic weekday detector, then the generic grammar (without
    /// the day-first "5 March" form, which misreads dictated numbers). Range
    /// merging, "since" and "around" are applied in that order.
    pub fn speech() -> Self {
        // Full weekday names belong to the speech grammar. Short forms are
        // ordinary words in dictation ("sat", "wed") and name no day.
        static WEEKDAY_WORDS: OnceLock<Regex> = OnceLock::new();
        let weekday_words = cached_pattern(&WEEKDAY_WORDS, || format!(r"\b(?:{})\b", vocab::WEEKDAYS));

        Self::builder()
            .parsers([
                Parser::MonthName,
                Parser::RelativePeriod,
                Parser::Weekday,
                Parser::Season,
                Parser::Holiday,
                Parser::RecentDays,
                Parser::Suppress(weekday_words.clone()),
            ])
            .parsers(
                generic_parsers()
                    .into_iter()
                    .filter(|p| !matches!(p, Parser::DayMonth)),
            )
            .refiners([Refiner::MergeRange, Refiner::Since, Refiner::Around])
            .build()
    }

    /// Replace the options of an existing pipeline.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Extract every date expression in `text`, interpreted relative to
    /// `reference`.
    ///
    /// Results are ordered by position and never overlap. Text without any
    /// recognisable date yields an empty vector.
    pub fn parse(&self, text: &str, reference: NaiveDate) -> Vec<ParsedResult> {
        let ctx = MatchContext {
            reference,
            options: &self.options,
        };

        let mut blanked: Vec<Range<usize>> = Vec::new();
        let mut candidates: Vec<(usize, ParsedResult)> = Vec::new();
        for (priority, parser) in self.parsers.iter().enumerate() {
            if let Parser::Suppress(re) = parser {
                blanked.extend(re.find_iter(text).map(|m| m.range()));
                continue;
            }
            for caps in parser.pattern().captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let span = whole.range();
                if blanked.iter().any(|b| b.start < span.end && span.start < b.end) {
                    trace!(text = whole.as_str(), "match suppressed");
                    continue;
                }
                match parser.extract(&caps, &ctx) {
                    Some(result) => candidates.push((priority, result)),
                    None => trace!(text = whole.as_str(), ?parser, "candidate rejected"),
                }
            }
        }

        let mut results = remove_overlaps(candidates);
        debug!(count = results.len(), "candidates after overlap removal");
        for refiner in &self.refiners {
            results = refiner.refine(text, results, &ctx);
        }
        results
    }
}

fn generic_parsers() -> Vec<Parser> {
    vec![
        Parser::IsoDate,
        Parser::MonthDay,
        Parser::DayMonth,
        Parser::Year,
        Parser::Casual,
        Parser::NearestWeekday,
    ]
}

/// Keep the longest of every group of overlapping candidates.
///
/// Candidates are visited by position; on equal length the earlier parser in
/// the pipeline wins.
fn remove_overlaps(mut candidates: Vec<(usize, ParsedResult)>) -> Vec<ParsedResult> {
    candidates.sort_by(|(pa, a), (pb, b)| {
        a.index
            .cmp(&b.index)
            .then(b.text.len().cmp(&a.text.len()))
            .then(pa.cmp(pb))
    });

    let mut kept: Vec<(usize, ParsedResult)> = Vec::with_capacity(candidates.len());
    for (priority, candidate) in candidates {
        let Some((last_priority, last)) = kept.last() else {
            kept.push((priority, candidate));
            continue;
        };
        if candidate.index >= last.end_index() {
            kept.push((priority, candidate));
            continue;
        }
        let longer = candidate.text.len() > last.text.len()
            || (candidate.text.len() == last.text.len() && priority < *last_priority);
        if longer {
            trace!(dropped = %last.text, kept = %candidate.text, "overlapping candidates");
            kept.pop();
            kept.push((priority, candidate));
        }
    }
    kept.into_iter().map(|(_, result)| result).collect()
}

/// Builder for custom [`TemporalParser`] pipelines.
///
/// ```
/// use chrono::NaiveDate;
/// use period_engine::{Parser, Refiner, TemporalParser};
///
/// let parser = TemporalParser::builder()
///     .parser(Parser::Season)
///     .refiner(Refiner::Since)
///     .build();
///
/// let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
/// let results = parser.parse("since last summer", today);
/// assert_eq!(results[0].end_date(), Some(today));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemporalParserBuilder {
    parsers: Vec<Parser>,
    refiners: Vec<Refiner>,
    options: ParseOptions,
}

impl TemporalParserBuilder {
    pub fn parser(mut self, parser: Parser) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn parsers(mut self, parsers: impl IntoIterator<Item = Parser>) -> Self {
        self.parsers.extend(parsers);
        self
    }

    pub fn refiner(mut self, refiner: Refiner) -> Self {
        self.refiners.push(refiner);
        self
    }

    pub fn refiners(mut self, refiners: impl IntoIterator<Item = Refiner>) -> Self {
        self.refiners.extend(refiners);
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> TemporalParser {
        TemporalParser {
            parsers: self.parsers,
            refiners: self.refiners,
            options: self.options,
        }
    }
}
