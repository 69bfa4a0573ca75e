use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use overlap_engine::timezone::parse_zone;
use overlap_engine::{MergePolicy, OverlapEngine, Validation};

use crate::cli::ZoneArgs;

/// Top-level `overlaps` configuration. Every section is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OverlapsConfig {
    /// Merge and validation settings.
    #[serde(default)]
    pub analysis: AnalysisToml,

    /// Timezone settings.
    #[serde(default)]
    pub display: DisplayToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AnalysisToml {
    #[serde(default)]
    pub policy: MergePolicy,
    #[serde(default)]
    pub reject_inverted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayToml {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_timezone")]
    pub floating_timezone: String,
}

impl Default for DisplayToml {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            floating_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Load the TOML file at `path`, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<OverlapsConfig> {
    let Some(path) = path else {
        return Ok(OverlapsConfig::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: OverlapsConfig = toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse TOML config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "config loaded");
    Ok(config)
}

/// Zones after applying command-line overrides to the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zones {
    pub display: Tz,
    pub floating: Tz,
}

impl OverlapsConfig {
    pub fn zones(&self, args: &ZoneArgs) -> Result<Zones> {
        let display = args.tz.as_deref().unwrap_or(&self.display.timezone);
        let floating = args
            .floating_tz
            .as_deref()
            .unwrap_or(&self.display.floating_timezone);
        Ok(Zones {
            display: parse_zone(display).context("invalid display timezone")?,
            floating: parse_zone(floating).context("invalid floating timezone")?,
        })
    }

    /// Build the engine; `policy` and `reject_inverted` come from the command line.
    pub fn engine(&self, policy: Option<MergePolicy>, reject_inverted: bool, display: Tz) -> OverlapEngine {
        let validation = if reject_inverted || self.analysis.reject_inverted {
            Validation::RejectInverted
        } else {
            Validation::Accept
        };
        OverlapEngine::new()
            .with_policy(policy.unwrap_or(self.analysis.policy))
            .with_validation(validation)
            .with_display_zone(display)
    }
}
