//! `slots` CLI — compute open meeting slots from a list of calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Events as a JSON array on stdin, plain-text listing on stdout
//! cat events.json | slots
//!
//! # From file to file, as JSON, scanning six weeks
//! slots events.json -o slots.json --format json --weeks 6
//!
//! # Pin "today" and override working hours
//! slots events.json --today 2026-03-02 --work-start 09:00 --work-end 12:00
//!
//! # Working hours and buffers can also come from the environment
//! WORK_START=10:00 BUFFER_MINUTES=15 slots events.json
//! ```
//!
//! Each event record is an object with `start`, `end` and optional `rrule`,
//! `exdates`, `tzid` and `summary` fields. Times are `YYYY-MM-DD`,
//! `YYYY-MM-DDTHH:MM[:SS]` (local) or RFC 3339.

mod render;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use slot_engine::config::{parse_time_of_day, parse_timezone};
use slot_engine::dst::DstPolicy;
use slot_engine::window::DEFAULT_WEEKS;
use slot_engine::{compute_availability, total_available, Config, EventSpec, ScanWindow};
use std::io::{self, Read};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Compute open meeting slots from a busy calendar"
)]
struct Cli {
    /// Input JSON file with event records (reads from stdin if omitted or "-")
    input: Option<String>,

    /// Output file (writes to stdout if omitted or "-")
    #[arg(short, long)]
    output: Option<String>,

    /// How many weeks ahead to scan
    #[arg(short, long, default_value_t = DEFAULT_WEEKS)]
    weeks: u32,

    /// Reference date the lead days are counted from (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Title of the text listing
    #[arg(long, default_value = "Available Time Slots")]
    title: String,

    /// IANA timezone for all day and working-hour math
    #[arg(long, env = "TZ", default_value = "Europe/Paris")]
    timezone: String,

    /// Working day start (HH:MM)
    #[arg(long, env = "WORK_START", default_value = "13:30")]
    work_start: String,

    /// Working day end (HH:MM)
    #[arg(long, env = "WORK_END", default_value = "17:00")]
    work_end: String,

    /// Business days to skip before the first available slot
    #[arg(long, env = "LEAD_DAYS", default_value_t = 3)]
    lead_days: u32,

    /// Break kept around each busy period, in minutes
    #[arg(long, env = "BUFFER_MINUTES", default_value_t = 10)]
    buffer_minutes: u32,

    /// Slots must be strictly longer than this many minutes
    #[arg(long, env = "MIN_SLOT_MINUTES", default_value_t = 44)]
    min_slot_minutes: u32,

    /// What to do with working hours that fall in a DST gap
    #[arg(long, value_enum, default_value_t = DstArg::ShiftForward)]
    dst_policy: DstArg,

    /// Increase log verbosity
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DstArg {
    Skip,
    ShiftForward,
}

impl From<DstArg> for DstPolicy {
    fn from(arg: DstArg) -> Self {
        match arg {
            DstArg::Skip => DstPolicy::Skip,
            DstArg::ShiftForward => DstPolicy::ShiftForward,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let tz = config.timezone();

    let today = cli
        .today
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let window = ScanWindow::from_today(today, cli.weeks, &config)
        .context("Failed to compute the scan window")?;

    info!("Today:  {}", today);
    info!(
        "Window: {} → {} ({} working-day lead)",
        window.start().date_naive(),
        window.end().date_naive(),
        config.lead_days()
    );
    info!(
        "Hours:  {}–{}, buffer {} min, min slot {} min",
        config.work_start().format("%H:%M"),
        config.work_end().format("%H:%M"),
        config.buffer_minutes(),
        config.min_slot_minutes()
    );

    let raw = read_input(cli.input.as_deref())?;
    let events = parse_events(&raw)?;

    let availability = compute_availability(&events, &window, &config)?;
    info!("Busy slots found: {}", availability.busy_count);
    debug!("Working blocks: {}", availability.block_count);
    if !availability.warnings.is_empty() {
        warn!(
            "{} event(s) skipped or treated as one-off",
            availability.warnings.len()
        );
        for warning in &availability.warnings {
            debug!("{}", warning);
        }
    }
    print_summary(&availability.slots);

    let content = match cli.format {
        Format::Json => render::json(&availability.slots)?,
        Format::Text => {
            let generated_at = Utc::now().with_timezone(&tz).format("%Y-%m-%d at %H:%M");
            render::text(&availability.slots, &cli.title, &generated_at.to_string())
        }
    };
    write_output(cli.output.as_deref(), &content)?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Build and validate the run configuration. Any problem here aborts the run
/// before the calendar is read.
fn build_config(cli: &Cli) -> Result<Config> {
    let timezone = parse_timezone(&cli.timezone).context("Invalid --timezone / TZ")?;
    let work_start =
        parse_time_of_day(&cli.work_start).context("Invalid --work-start / WORK_START")?;
    let work_end = parse_time_of_day(&cli.work_end).context("Invalid --work-end / WORK_END")?;

    let config = Config::new(timezone, work_start, work_end)?
        .with_lead_days(cli.lead_days)
        .with_buffer_minutes(cli.buffer_minutes)
        .with_min_slot_minutes(cli.min_slot_minutes)
        .with_dst_policy(cli.dst_policy.into());
    config.validate()?;
    Ok(config)
}

/// Parse a JSON array of event records. A record that does not deserialize is
/// skipped with a warning; the rest are kept.
fn parse_events(raw: &str) -> Result<Vec<EventSpec>> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(raw).context("Input must be a JSON array of event records")?;

    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let label = record
            .get("summary")
            .and_then(|s| s.as_str())
            .unwrap_or("?")
            .to_string();
        match serde_json::from_value::<EventSpec>(record) {
            Ok(event) => events.push(event),
            Err(e) => warn!(
                event = %label,
                index,
                error = %e,
                "skipping unparseable event"
            ),
        }
    }
    Ok(events)
}

fn print_summary(slots: &[slot_engine::Interval]) {
    let total_hours = total_available(slots).num_minutes() as f64 / 60.0;
    info!(
        "Available slots: {} ({:.1} h total)",
        slots.len(),
        total_hours
    );
    for slot in slots.iter().take(5) {
        info!(
            "  • {} – {} ({})",
            slot.start().format("%a %Y-%m-%d %H:%M"),
            slot.end().format("%H:%M"),
            render::human_duration(slot)
        );
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
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
        Some(path) if path != "-" => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
            info!("Written to {}", path);
        }
        _ => {
            print!("{}", content);
        }
    }
    Ok(())
}
