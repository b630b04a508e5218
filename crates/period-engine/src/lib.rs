//! # period-engine
//!
//! Deterministic temporal reasoning for health-data exploration.
//!
//! The engine turns spoken or typed date expressions into concrete day
//! ranges, names a day range relative to "today" ("last week", "this month"),
//! serves contiguous runs of days from an incrementally grown cache, and
//! groups sorted values into dense clusters for chart binning. Nothing here
//! reads the system clock: every operation takes its reference date
//! explicitly.
//!
//! ## Modules
//!
//! - [`date`] — `YYYYMMDD` integer dates and inclusive day ranges
//! - [`period`] — Week/month/year boundaries, shifting, period indices and range subtraction
//! - [`parse`] — Natural-language date extraction with speech and generic presets
//! - [`classify`] — Recognise a range as exactly one Sunday week, month or year
//! - [`sequence`] — Contiguous day-sequence cache
//! - [`cluster`] — One-dimensional density clustering
//! - [`error`] — Error types

pub mod classify;
pub mod cluster;
pub mod date;
pub mod error;
pub mod parse;
pub mod period;
pub mod sequence;

pub use classify::{classify_range, RangeSemantic};
pub use cluster::{cluster_sorted, cluster_sorted_by_key, Gap};
pub use date::{DateRange, IntegerDate};
pub use error::{EngineError, Result};
pub use parse::{
    Certainty, Field, Granularity, ParseOptions, ParsedComponents, ParsedResult, Parser, Refiner,
    Tag, TemporalParser, TemporalParserBuilder,
};
pub use period::{PeriodKind, WeekStartDay};
pub use sequence::{DateSequenceCache, SharedDateSequenceCache};
