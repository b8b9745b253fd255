//! `booking` CLI — inspect booking availability from a profile JSON document.
//!
//! ## Usage
//!
//! ```sh
//! # Status of every date in the booking horizon for 45-minute appointments
//! booking calendar -i salon.json --duration 45
//!
//! # Open slots on one date, with "today" pinned for reproducible output
//! booking slots -i salon.json --date 2025-07-15 --duration 45 --today 2025-07-14
//!
//! # Status of a single date, resolving "today" in the salon's timezone
//! booking status -i salon.json --date 2025-07-19 --duration 60 --timezone Europe/Stockholm
//!
//! # Profile from stdin, 15-minute start-time grid
//! cat salon.json | booking slots --date 2025-07-15 --duration 60 --grid-step 15
//! ```
//!
//! Defaults for the horizon and grid step come from `BOOKING_*` environment
//! variables (a `.env` file is honoured); flags override them. Set
//! `BOOKING_LOG=debug` for diagnostics on stderr.

use anyhow::{Context, Result};
use booking_engine::classifier::{classify, closure_reason, ClosureReason, DateStatus};
use booking_engine::horizon::build_calendar;
use booking_engine::slots::enumerate_slots;
use booking_engine::{parse_date, AvailabilityProfile, Clock, EngineConfig, SystemClock};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Booking availability: calendars, open slots, and date status"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Status (available, fully_booked, closed) of every date in the horizon
    Calendar {
        #[command(flatten)]
        common: CommonArgs,
        /// Days to cover, counting today (default: BOOKING_HORIZON_DAYS or 60)
        #[arg(long)]
        horizon_days: Option<u32>,
    },
    /// Open time slots on one date
    Slots {
        #[command(flatten)]
        common: CommonArgs,
        /// Date to enumerate (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Status of one date
    Status {
        #[command(flatten)]
        common: CommonArgs,
        /// Date to classify (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Profile JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Appointment length in minutes
    #[arg(short, long)]
    duration: u32,
    /// Minutes between candidate start times (default: the duration)
    #[arg(long)]
    grid_step: Option<u32>,
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, conflicts_with = "timezone")]
    today: Option<String>,
    /// IANA timezone used to determine today (default: host local time)
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Serialize)]
struct StatusReport {
    date: NaiveDate,
    status: DateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<ClosureReason>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env().context("Failed to read BOOKING_* environment")?;

    match cli.command {
        Commands::Calendar {
            common,
            horizon_days,
        } => {
            if let Some(days) = horizon_days {
                config.horizon_days = days;
            }
            let (profile, today) = prepare(&common, &mut config)?;
            let grid = config.grid_for(common.duration);

            let calendar = build_calendar(&profile, grid, today, config.horizon_days);
            print_json(&calendar)?;
        }
        Commands::Slots { common, date } => {
            let (profile, today) = prepare(&common, &mut config)?;
            let date = parse_date(&date)?;
            let grid = config.grid_for(common.duration);

            let slots = enumerate_slots(date, &profile, grid, today);
            tracing::debug!(%date, count = slots.len(), "enumerated slots");
            print_json(&slots)?;
        }
        Commands::Status { common, date } => {
            let (profile, today) = prepare(&common, &mut config)?;
            let date = parse_date(&date)?;
            let grid = config.grid_for(common.duration);

            print_json(&StatusReport {
                date,
                status: classify(date, &profile, grid, today),
                reason: closure_reason(date, &profile, today),
            })?;
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BOOKING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Apply flag overrides, validate the config, and load the profile and today.
fn prepare(
    common: &CommonArgs,
    config: &mut EngineConfig,
) -> Result<(AvailabilityProfile, NaiveDate)> {
    if let Some(step) = common.grid_step {
        config.grid_step = Some(step);
    }
    config.validate()?;
    if common.duration == 0 {
        anyhow::bail!("--duration must be greater than 0");
    }

    let raw = read_input(common.input.as_deref())?;
    let profile: AvailabilityProfile =
        serde_json::from_str(&raw).context("Failed to parse availability profile JSON")?;
    let today = resolve_today(common.today.as_deref(), common.timezone.as_deref())?;
    tracing::debug!(%today, business_hours = %profile.business_hours, "profile loaded");

    Ok((profile, today))
}

/// `--today` wins; otherwise today in `--timezone`; otherwise host local date.
fn resolve_today(today: Option<&str>, timezone: Option<&str>) -> Result<NaiveDate> {
    if let Some(raw) = today {
        return Ok(parse_date(raw)?);
    }
    match timezone {
        Some(name) => {
            let tz: chrono_tz::Tz = name
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", name))?;
            Ok(Utc::now().with_timezone(&tz).date_naive())
        }
        None => Ok(SystemClock.today()),
    }
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

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
