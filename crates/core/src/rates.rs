//! Rate configuration for visit billing.
//!
//! Every price and threshold the calculator reads is a configuration value
//! so operators can retune pricing without a code change. Defaults match
//! the reference deployment.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Standard tier: price per person for the first billed hour.
pub const DEFAULT_FIRST_HOUR_RATE: Amount = 10.0;
/// Standard tier: price per person for each billed hour after the first.
pub const DEFAULT_NEXT_HOUR_RATE: Amount = 5.0;
/// Large hall: flat price per person per hour.
pub const DEFAULT_LARGE_HOUR_RATE: Amount = 100.0;
/// Small hall: flat price per person per hour.
pub const DEFAULT_SMALL_HOUR_RATE: Amount = 50.0;
/// Visits shorter than this many net minutes are free.
pub const DEFAULT_GRACE_MINUTES: u32 = 15;
/// Remainder minutes at or above which a partial hour bills as a full one.
pub const DEFAULT_ROUND_UP_THRESHOLD_MINUTES: u32 = 15;

pub const MINUTES_PER_HOUR: u32 = 60;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const ENV_FIRST_HOUR_RATE: &str = "RATE_FIRST_HOUR";
pub const ENV_NEXT_HOUR_RATE: &str = "RATE_NEXT_HOUR";
pub const ENV_LARGE_HOUR_RATE: &str = "RATE_LARGE_HOUR";
pub const ENV_SMALL_HOUR_RATE: &str = "RATE_SMALL_HOUR";
pub const ENV_GRACE_MINUTES: &str = "GRACE_MINUTES";
pub const ENV_ROUND_UP_THRESHOLD_MINUTES: &str = "ROUND_UP_THRESHOLD_MINUTES";

// ---------------------------------------------------------------------------
// RateConfig
// ---------------------------------------------------------------------------

/// Prices and thresholds used by [`crate::billing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateConfig {
    pub first_hour_rate: Amount,
    pub next_hour_rate: Amount,
    pub large_hour_rate: Amount,
    pub small_hour_rate: Amount,
    pub grace_minutes: u32,
    pub round_up_threshold_minutes: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            first_hour_rate: DEFAULT_FIRST_HOUR_RATE,
            next_hour_rate: DEFAULT_NEXT_HOUR_RATE,
            large_hour_rate: DEFAULT_LARGE_HOUR_RATE,
            small_hour_rate: DEFAULT_SMALL_HOUR_RATE,
            grace_minutes: DEFAULT_GRACE_MINUTES,
            round_up_threshold_minutes: DEFAULT_ROUND_UP_THRESHOLD_MINUTES,
        }
    }
}

impl RateConfig {
    /// Load rates from environment variables, falling back to defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `RATE_FIRST_HOUR`            | `10`    |
    /// | `RATE_NEXT_HOUR`             | `5`     |
    /// | `RATE_LARGE_HOUR`            | `100`   |
    /// | `RATE_SMALL_HOUR`            | `50`    |
    /// | `GRACE_MINUTES`              | `15`    |
    /// | `ROUND_UP_THRESHOLD_MINUTES` | `15`    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RateConfig::from_env`] but reads values through `lookup`,
    /// which lets callers supply a fixed map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            first_hour_rate: parse_var(&lookup, ENV_FIRST_HOUR_RATE, DEFAULT_FIRST_HOUR_RATE)?,
            next_hour_rate: parse_var(&lookup, ENV_NEXT_HOUR_RATE, DEFAULT_NEXT_HOUR_RATE)?,
            large_hour_rate: parse_var(&lookup, ENV_LARGE_HOUR_RATE, DEFAULT_LARGE_HOUR_RATE)?,
            small_hour_rate: parse_var(&lookup, ENV_SMALL_HOUR_RATE, DEFAULT_SMALL_HOUR_RATE)?,
            grace_minutes: parse_var(&lookup, ENV_GRACE_MINUTES, DEFAULT_GRACE_MINUTES)?,
            round_up_threshold_minutes: parse_var(
                &lookup,
                ENV_ROUND_UP_THRESHOLD_MINUTES,
                DEFAULT_ROUND_UP_THRESHOLD_MINUTES,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every rate is a finite non-negative amount and the
    /// round-up threshold lies within `1..=60`.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_rate(self.first_hour_rate, "firstHourRate")?;
        validate_rate(self.next_hour_rate, "nextHourRate")?;
        validate_rate(self.large_hour_rate, "largeHourRate")?;
        validate_rate(self.small_hour_rate, "smallHourRate")?;

        if !(1..=MINUTES_PER_HOUR).contains(&self.round_up_threshold_minutes) {
            return Err(CoreError::Validation(format!(
                "roundUpThresholdMinutes must be between 1 and {MINUTES_PER_HOUR}, got {}",
                self.round_up_threshold_minutes
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw.trim().parse::<T>().map_err(|_| {
                CoreError::Validation(format!("{key} must be a number, got {raw:?}"))
            })?;
            tracing::debug!(key, %value, "Rate override from environment");
            Ok(value)
        }
        None => Ok(default),
    }
}

fn validate_rate(value: Amount, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
