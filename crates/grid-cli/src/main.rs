//! `calgrid` CLI — inspect event layouts and replay view navigation.
//!
//! ## Usage
//!
//! ```sh
//! # Lay out events (JSON array of {id, start, end}) from stdin
//! cat events.json | calgrid layout
//!
//! # Lay out per day column for a week, with midnight in Berlin
//! calgrid layout -i events.json --from 2026-03-02 --to 2026-03-08 --timezone Europe/Berlin
//!
//! # Replay navigation from the initial state for a given day
//! calgrid navigate --today 2026-03-04 mode:month pick:2026-03-07 swipe:next
//!
//! # Continue from a saved state, with a custom swipe threshold
//! calgrid navigate --state state.json --swipe-threshold 60 drag:-75,4
//! ```
//!
//! Set `RUST_LOG` or pass `-v` to see engine decisions on stderr.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{ArgAction, Parser, Subcommand};
use grid_engine::{
    DateRange, EventLayout, NavigationAction, NavigationState, SwipeConfig, TimeInterval,
    DEFAULT_SWIPE_THRESHOLD,
};
use std::collections::BTreeMap;
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "calgrid",
    version,
    about = "Calendar grid layout and view navigation CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute side-by-side layouts for overlapping events
    Layout {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First day column (YYYY-MM-DD); requires --to
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day column (YYYY-MM-DD, inclusive); requires --from
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// IANA timezone whose midnight separates day columns
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Apply navigation actions and print the resulting state
    Navigate {
        /// Actions applied in order: mode:<mode>, pick:<date|none>, dismiss,
        /// swipe:<next|prev>, drag:<dx>,<dy>
        #[arg(value_name = "ACTION")]
        actions: Vec<NavigationAction>,
        /// Today's date (defaults to the current date in --timezone)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// IANA timezone used to determine today's date
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Start from the state in this JSON file instead of the initial state
        #[arg(long)]
        state: Option<String>,
        /// Horizontal drag that must be exceeded to count as a swipe
        #[arg(long, default_value_t = DEFAULT_SWIPE_THRESHOLD)]
        swipe_threshold: f32,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Layout {
            input,
            output,
            from,
            to,
            timezone,
        } => {
            let json = read_input(input.as_deref())?;
            let events: Vec<TimeInterval<String>> =
                serde_json::from_str(&json).context("Failed to parse events JSON")?;
            info!(events = events.len(), "loaded events");

            let rendered = match (from, to) {
                (Some(from), Some(to)) => {
                    let days = DateRange::new(from, to).context("Invalid --from/--to range")?;
                    let tz = parse_timezone(&timezone)?;
                    let by_day: BTreeMap<String, BTreeMap<String, EventLayout>> =
                        grid_engine::compute_day_layouts(&events, &days, tz)
                            .into_iter()
                            .map(|(day, layouts)| (day.to_string(), layouts.into_iter().collect()))
                            .collect();
                    serde_json::to_string_pretty(&by_day)?
                }
                _ => {
                    let layouts: BTreeMap<String, EventLayout> =
                        grid_engine::compute_layouts(&events).into_iter().collect();
                    serde_json::to_string_pretty(&layouts)?
                }
            };

            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Navigate {
            actions,
            today,
            timezone,
            state,
            swipe_threshold,
            output,
        } => {
            let config = SwipeConfig::try_with_threshold(swipe_threshold)
                .context("Invalid --swipe-threshold")?;

            let today = match today {
                Some(day) => day,
                None => {
                    let tz = parse_timezone(&timezone)?;
                    Utc::now().with_timezone(&tz).date_naive()
                }
            };

            let start = match state.as_deref() {
                Some(path) => {
                    let json = read_input(Some(path))?;
                    serde_json::from_str::<NavigationState>(&json)
                        .with_context(|| format!("Failed to parse navigation state: {}", path))?
                }
                None => NavigationState::initial(today),
            };

            let end = actions
                .into_iter()
                .fold(start, |current, action| current.apply(action, today, &config));

            write_output(output.as_deref(), &serde_json::to_string_pretty(&end)?)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `-v` flags take precedence over `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", name))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
