use std::collections::BTreeSet;
use std::io::{self, IsTerminal, Read};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use period_engine::{
    classify_range, cluster_sorted, DateSequenceCache, IntegerDate, ParseOptions, RangeSemantic,
    Tag, TemporalParser, WeekStartDay,
};
use serde::Serialize;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

const LONG_ABOUT: &str = r##"
Deterministic date reasoning from the command line. Every command prints JSON.

EXAMPLES:
  period parse "steps from last monday to this wednesday"
  period --today 2020-03-01 parse "since last winter"
  period classify 20200202 20200208
  period days 20200227 20200302
  period cluster --gap 5 0 1 2 10 11 12 18
"##;

#[derive(Parser, Debug)]
#[command(name = "period", version, about = "Parse, classify, enumerate and cluster dates", long_about = LONG_ABOUT)]
struct Cli {
    /// Reference day for relative expressions (YYYY-MM-DD). Defaults to the
    /// local date.
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// RUST_LOG directives take precedence.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract date expressions from text (reads stdin when no text is given)
    Parse {
        text: Vec<String>,

        /// Use the written-date grammar instead of the speech grammar
        #[arg(long)]
        generic: bool,

        /// First day of the week for "this week" and weekday qualifiers
        #[arg(long, value_enum, default_value_t = WeekStart::Monday)]
        week_start: WeekStart,

        /// Half-width in days of the window produced by "around X"
        #[arg(long, value_name = "DAYS", default_value_t = 3)]
        around_days: u32,
    },
    /// Name a YYYYMMDD range as a Sunday week, month or year
    Classify { start: IntegerDate, end: IntegerDate },
    /// List every day of a YYYYMMDD range
    Days { start: IntegerDate, end: IntegerDate },
    /// Split ascending numbers into dense clusters
    Cluster {
        /// Largest gap between neighbours within one cluster
        #[arg(long, allow_negative_numbers = true)]
        gap: f64,

        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for WeekStartDay {
    fn from(value: WeekStart) -> Self {
        match value {
            WeekStart::Monday => WeekStartDay::Monday,
            WeekStart::Sunday => WeekStartDay::Sunday,
        }
    }
}

/// A parsed expression resolved to concrete days.
#[derive(Serialize)]
struct Span<'a> {
    text: &'a str,
    index: usize,
    start: IntegerDate,
    end: IntegerDate,
    tags: &'a BTreeSet<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Label>,
}

#[derive(Serialize)]
struct Label {
    #[serde(flatten)]
    semantic: RangeSemantic,
    phrase: String,
}

impl From<RangeSemantic> for Label {
    fn from(semantic: RangeSemantic) -> Self {
        Self {
            phrase: semantic.phrase(),
            semantic,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(%today, "reference day");

    let output = match cli.command {
        Command::Parse {
            text,
            generic,
            week_start,
            around_days,
        } => {
            let text = if text.is_empty() {
                read_stdin()?
            } else {
                text.join(" ")
            };
            let options = ParseOptions {
                week_start: week_start.into(),
                around_radius_days: around_days,
            };
            parse(&text, today, generic, options)?
        }
        Command::Classify { start, end } => {
            if start > end {
                bail!("start {start} is after end {end}");
            }
            let label = classify_range(start, end, today).map(Label::from);
            serde_json::to_value(label)?
        }
        Command::Days { start, end } => {
            let mut cache = DateSequenceCache::new();
            serde_json::to_value(cache.get_sequence(start, end))?
        }
        Command::Cluster { gap, values } => {
            if values.windows(2).any(|pair| pair[0] > pair[1]) {
                bail!("values must be sorted ascending");
            }
            if gap.is_nan() || values.iter().any(|v| v.is_nan()) {
                bail!("NaN is not a valid value");
            }
            serde_json::to_value(cluster_sorted(&values, gap))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_stdin() -> Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no text given; pass it as arguments or pipe it on stdin");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text.trim().to_string())
}

fn parse(
    text: &str,
    today: NaiveDate,
    generic: bool,
    options: ParseOptions,
) -> Result<serde_json::Value> {
    let parser = if generic {
        TemporalParser::generic()
    } else {
        TemporalParser::speech()
    }
    .with_options(options);

    let results = parser.parse(text, today);
    let spans: Vec<Span<'_>> = results
        .iter()
        .filter_map(|result| {
            let Some(range) = result.to_range() else {
                tracing::debug!(text = %result.text, "span outside the representable range");
                return None;
            };
            Some(Span {
                text: &result.text,
                index: result.index,
                start: range.start,
                end: range.end,
                tags: &result.tags,
                period: classify_range(range.start, range.end, today).map(Label::from),
            })
        })
        .collect();
    serde_json::to_value(spans).context("Failed to serialize parse results")
}
