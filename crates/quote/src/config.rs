use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

use xspace_core::rates::RateConfig;

/// Default interval between running-total refreshes in watch mode.
pub const DEFAULT_TICK_SECS: u64 = 1;

/// How a quote is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("QUOTE_FORMAT must be `text` or `json`, got `{other}`"),
        }
    }
}

/// Quote tool configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Visit snapshot to bill.
    pub visit_file: PathBuf,
    pub format: OutputFormat,
    /// Keep re-printing the running total until check-out or Ctrl-C.
    pub watch: bool,
    pub tick: Duration,
    pub rates: RateConfig,
}

impl QuoteConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default |
    /// |-------------------|---------|
    /// | `VISIT_FILE`      | --      |
    /// | `QUOTE_FORMAT`    | `text`  |
    /// | `QUOTE_WATCH`     | `false` |
    /// | `QUOTE_TICK_SECS` | `1`     |
    ///
    /// Rates are read by [`RateConfig::from_env`].
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let visit_file = lookup("VISIT_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .context("VISIT_FILE environment variable is required")?;

        let format = match lookup("QUOTE_FORMAT") {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };

        let watch = match lookup("QUOTE_WATCH") {
            Some(raw) => parse_flag(&raw).context("QUOTE_WATCH must be a boolean")?,
            None => false,
        };

        let tick_secs: u64 = match lookup("QUOTE_TICK_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("QUOTE_TICK_SECS must be a valid u64")?,
            None => DEFAULT_TICK_SECS,
        };
        if tick_secs == 0 {
            bail!("QUOTE_TICK_SECS must be at least 1");
        }

        let rates = RateConfig::from_lookup(&lookup).context("Invalid rate configuration")?;

        Ok(Self {
            visit_file,
            format,
            watch,
            tick: Duration::from_secs(tick_secs),
            rates,
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("unrecognized flag value `{other}`"),
    }
}
