use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use overlap_engine::MergePolicy;

/// Multi-way overlap ranking for ICS calendars.
#[derive(Parser)]
#[command(
    name = "overlaps",
    version,
    about = "Rank overlapping events across ICS calendars"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Rank all overlaps, largest participant groups first.
    Rank(RankArgs),
    /// List time slots in which no calendar is busy.
    Free(FreeArgs),
}

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Timezone overrides shared by all subcommands.
#[derive(clap::Args)]
pub struct ZoneArgs {
    /// IANA zone used to display timestamps (overrides `[display].timezone`).
    #[arg(long)]
    pub tz: Option<String>,

    /// IANA zone for ICS times without a zone (overrides `[display].floating_timezone`).
    #[arg(long = "floating-tz")]
    pub floating_tz: Option<String>,
}

/// Arguments for the `rank` subcommand.
#[derive(clap::Args)]
pub struct RankArgs {
    /// ICS files; calendar indices follow argument order starting at 0.
    #[arg(required = true)]
    pub calendars: Vec<PathBuf>,

    /// Collision policy: distinct (default), accumulate or overwrite (overrides `[analysis].policy`).
    #[arg(long)]
    pub policy: Option<MergePolicy>,

    /// Fail on events that end before they start.
    #[arg(long)]
    pub reject_inverted: bool,

    #[command(flatten)]
    pub zones: ZoneArgs,

    /// Also write the ranking as CSV to this path.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Output format for stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `free` subcommand.
#[derive(clap::Args)]
pub struct FreeArgs {
    /// ICS files whose events count as busy time.
    #[arg(required = true)]
    pub calendars: Vec<PathBuf>,

    /// Window start (RFC 3339, e.g. 2025-05-02T08:00:00Z).
    #[arg(long, value_parser = parse_instant)]
    pub from: DateTime<Utc>,

    /// Window end (RFC 3339).
    #[arg(long, value_parser = parse_instant)]
    pub to: DateTime<Utc>,

    /// Only list slots at least this many minutes long.
    #[arg(long, default_value_t = 0)]
    pub min_minutes: i64,

    /// Print only the earliest qualifying slot.
    #[arg(long)]
    pub first: bool,

    #[command(flatten)]
    pub zones: ZoneArgs,

    /// Output format for stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
