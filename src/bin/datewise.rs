//! Datewise CLI tool
//!
//! A command-line front end for finding dates and ISO weeks in text.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use datewise::calendar::{iso_week_of, week_start, weeks_in_year, IsoWeek};
use datewise::{en, DebugSink, Field, ParseOptions, ParsedComponents, ReferenceInstant, TimezoneSpec};

/// Datewise - Find dates, times and ISO weeks in text
#[derive(Parser)]
#[command(name = "datewise")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Find dates relative to a fixed reference
    datewise parse \"from Week 45 to Week 48\" --reference 2024-06-01

    # Relative weeks in a named zone
    datewise parse \"the week before last\" --reference 2023-01-15 --timezone Europe/Berlin

    # Custom timezone abbreviation
    datewise parse \"call at 10:30 HQ\" --tz-abbr HQ=-300

    # ISO week of a date
    datewise week 2024-12-30

    # Monday of an ISO week
    datewise week-start 1 2025")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every date expression in a piece of text
    Parse {
        /// Text to search
        text: String,

        /// Reference instant (RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD); defaults to now
        #[arg(long)]
        reference: Option<String>,

        /// Reference timezone: IANA name or minutes east of UTC
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        timezone: String,

        /// Move dates that fall in the past to their next occurrence
        #[arg(long)]
        forward_date: bool,

        /// Print pipeline debug messages
        #[arg(long)]
        debug: bool,

        /// Extra timezone abbreviation, e.g. HQ=-300 (repeatable)
        #[arg(long = "tz-abbr", value_name = "ABBR=MINUTES", allow_hyphen_values = true)]
        tz_abbr: Vec<String>,
    },

    /// Show the ISO week of a date
    Week {
        /// Date in YYYY-MM-DD format
        date: String,
    },

    /// Show the Monday of an ISO week
    WeekStart {
        /// ISO week number (1-53)
        week: u32,

        /// ISO week-year
        year: i32,
    },
}

fn main() {
    let cli = Cli::parse();

    let debug = matches!(cli.command, Commands::Parse { debug: true, .. });
    init_tracing(debug);

    let result = match cli.command {
        Commands::Parse {
            text, reference, timezone, forward_date, debug, tz_abbr,
        } => cmd_parse(&text, reference.as_deref(), &timezone, forward_date, debug, &tz_abbr),
        Commands::Week { date } => cmd_week(&date),
        Commands::WeekStart { week, year } => cmd_week_start(week, year),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Log to stderr, honouring RUST_LOG
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `ABBR=MINUTES`
fn parse_abbreviation(spec: &str) -> Result<(String, i32)> {
    let (name, minutes) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ABBR=MINUTES, got {:?}", spec))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("empty abbreviation in {:?}", spec);
    }
    let minutes = minutes
        .trim()
        .parse::<i32>()
        .with_context(|| format!("invalid offset in {:?}", spec))?;
    Ok((name.to_string(), minutes))
}

fn describe(label: &str, components: &ParsedComponents) {
    let week = components.iso_week();
    println!("  {}: {}", label, components.instant().to_rfc3339());
    println!("    ISO week: {}", week);

    let known: Vec<String> = components
        .known()
        .iter()
        .map(|(field, value)| format!("{}={}", field, value))
        .collect();
    println!("    known: {}", known.join(", "));

    if components.is_absent(Field::Hour) {
        println!("    hour: unset");
    }
}

fn cmd_parse(
    text: &str,
    reference: Option<&str>,
    timezone: &str,
    forward_date: bool,
    debug: bool,
    tz_abbr: &[String],
) -> Result<()> {
    let timezone: TimezoneSpec = timezone
        .parse()
        .with_context(|| format!("invalid timezone {:?}", timezone))?;

    let reference = match reference {
        Some(reference) => ReferenceInstant::parse(reference, &timezone)
            .with_context(|| format!("invalid reference {:?}", reference))?,
        None => ReferenceInstant::new(Utc::now(), &timezone)?,
    };

    let mut options = ParseOptions::new().with_forward_date(forward_date);
    if debug {
        options = options.with_debug(DebugSink::callback(|message| eprintln!("[debug] {}", message)));
    }
    for spec in tz_abbr {
        let (name, minutes) = parse_abbreviation(spec)?;
        options = options.with_timezone(&name, minutes);
    }

    let results = en::casual().parse(text, reference, &options);
    println!("Reference: {} ({})", reference.to_local().to_rfc3339(), reference.zone());

    if results.is_empty() {
        println!("No dates found");
        return Ok(());
    }

    for result in &results {
        let end_index = result.index() + result.text().len();
        println!("[{}..{}] {:?}", result.index(), end_index, result.text());
        describe("start", result.start());
        if let Some(end) = result.end() {
            describe("end", end);
        }
        let tags: Vec<&str> = result.tags().iter().map(String::as_str).collect();
        println!("  tags: {}", tags.join(", "));
    }

    Ok(())
}

fn cmd_week(date: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {:?}, expected YYYY-MM-DD", date))?;
    let week = iso_week_of(date);

    println!("Date:      {}", date);
    println!("ISO week:  {}", week.week);
    println!("Week-year: {} ({} weeks)", week.week_year, weeks_in_year(week.week_year));
    if let (Some(monday), Some(sunday)) = (week.monday(), week.sunday()) {
        println!("Monday:    {}", monday);
        println!("Sunday:    {}", sunday);
    }

    Ok(())
}

fn cmd_week_start(week: u32, year: i32) -> Result<()> {
    if !IsoWeek::new(week, year).is_valid() {
        bail!("{} has no week {} (it has {} weeks)", year, week, weeks_in_year(year));
    }
    let monday = week_start(week, year).ok_or_else(|| anyhow!("week {} of {} is out of range", week, year))?;
    println!("{}", monday);
    Ok(())
}
