//! Rank command: read ICS calendars, rank their overlaps, print and export.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use overlap_engine::ics::read_calendars;

use crate::cli::{OutputFormat, RankArgs};
use crate::config::OverlapsConfig;

/// Run the ranking pipeline.
pub fn run(args: RankArgs, config: &OverlapsConfig) -> Result<()> {
    let _cmd = info_span!("rank").entered();

    // 1. Resolve options: command line over config file
    let zones = config.zones(&args.zones)?;
    let engine = config.engine(args.policy, args.reject_inverted, zones.display);

    // 2. Read calendars, index i = i-th path
    let calendars =
        read_calendars(&args.calendars, zones.floating).context("failed to read calendars")?;
    info!(n = calendars.len(), "calendars loaded");

    // 3. Rank
    let ranking = engine.analyze(&calendars).context("overlap analysis failed")?;

    // 4. Present
    match args.format {
        OutputFormat::Text => engine.print(&ranking)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ranking)
                .context("failed to serialize ranking")?;
            println!("{json}");
        }
    }

    if let Some(path) = &args.csv {
        engine
            .export(&ranking, path)
            .with_context(|| format!("failed to export CSV: {}", path.display()))?;
    }

    Ok(())
}
