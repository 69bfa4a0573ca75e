//! Free command: list slots in a window where none of the calendars is busy.

use anyhow::{bail, Context, Result};
use tracing::{info, info_span};

use overlap_engine::freebusy::find_first_common_free_slot;
use overlap_engine::ics::read_calendars;
use overlap_engine::report::{format_duration, format_time};
use overlap_engine::{find_common_free_slots, FreeSlot};

use crate::cli::{FreeArgs, OutputFormat};
use crate::config::OverlapsConfig;

/// Run the free-slot search.
pub fn run(args: FreeArgs, config: &OverlapsConfig) -> Result<()> {
    let _cmd = info_span!("free").entered();

    if args.from >= args.to {
        bail!("empty window: --from must be earlier than --to");
    }
    if args.min_minutes < 0 {
        bail!("--min-minutes must not be negative");
    }

    let zones = config.zones(&args.zones)?;
    let calendars =
        read_calendars(&args.calendars, zones.floating).context("failed to read calendars")?;

    let slots: Vec<FreeSlot> = if args.first {
        find_first_common_free_slot(&calendars, args.from, args.to, args.min_minutes)
            .into_iter()
            .collect()
    } else {
        find_common_free_slots(&calendars, args.from, args.to)
            .into_iter()
            .filter(|slot| slot.duration_minutes >= args.min_minutes)
            .collect()
    };
    info!(n = slots.len(), "free slots found");

    match args.format {
        OutputFormat::Text => {
            if slots.is_empty() {
                println!("No common free time found.");
            }
            for slot in &slots {
                println!(
                    "Free: {} - {} ({})",
                    format_time(slot.start, zones.display),
                    format_time(slot.end, zones.display),
                    format_duration(slot.end - slot.start),
                );
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&slots).context("failed to serialize free slots")?;
            println!("{json}");
        }
    }

    Ok(())
}
