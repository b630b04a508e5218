//! Word lists and regex fragments shared by the parsers.

use chrono::Weekday;

/// Month names and abbreviations, longest spelling first so alternation
/// prefers the full word.
pub(crate) const MONTHS: &str = "january|jan|february|feb|march|mar|april|apr|may|june|jun|\
july|jul|august|aug|september|sept|sep|october|oct|november|nov|december|dec";

pub(crate) const WEEKDAYS: &str = "sunday|sun|monday|mon|tuesday|tues|tue|wednesday|wed|\
thursday|thurs|thur|thu|friday|fri|saturday|sat";

/// Weekday names as a speech recogniser writes them. The short forms in
/// [`WEEKDAYS`] double as ordinary words ("sat", "wed", "sun").
pub(crate) const SPOKEN_WEEKDAYS: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday";

/// Spelled-out counts a speech recogniser produces for small numbers.
pub(crate) const NUMBER_WORDS: &str = "one|two|three|four|five|six|seven|eight|nine|ten|\
eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|\
thirty|forty|fifty|sixty|ninety|hundred";

/// Parse a month name to number (1-12).
pub(crate) fn parse_month(s: &str) -> Option<u32> {
    match s.to_lowercase().trim_end_matches('.') {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Parse a weekday name (case-insensitive, supports full and abbreviated).
pub(crate) fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a count written as digits or as a number word.
pub(crate) fn parse_count(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let n = match s.to_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "ninety" => 90,
        "hundred" => 100,
        _ => return None,
    };
    Some(n)
}

/// Split a run of qualifier words ("last  Last ") into lowercase words.
pub(crate) fn qualifier_words(s: &str) -> Vec<String> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
