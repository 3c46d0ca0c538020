//! Simulation configuration
//!
//! The Telnet and DNS tools never touch the network; their latency and
//! outcome odds come from here. Values are read from environment variables
//! and fall back to the defaults below.

use crate::{NetToolError, Result};
use std::env;
use std::time::Duration;

/// Simulated latency in milliseconds
pub const DELAY_MS_VAR: &str = "NETTOOL_DELAY_MS";
/// Roll threshold at or below which a simulated connection fails
pub const FAILURE_THRESHOLD_VAR: &str = "NETTOOL_FAILURE_THRESHOLD";
/// Upper bound for a simulated lookup in milliseconds
pub const LOOKUP_TIMEOUT_MS_VAR: &str = "NETTOOL_LOOKUP_TIMEOUT_MS";

const DEFAULT_DELAY: Duration = Duration::from_millis(1500);
const DEFAULT_FAILURE_THRESHOLD: f64 = 0.3;
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Knobs for the simulated tools
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// How long every simulated operation takes
    pub delay: Duration,
    /// A connection attempt succeeds when its roll is strictly above this
    pub failure_threshold: f64,
    /// Simulated lookups taking longer than this fail
    pub lookup_timeout: Duration,
}

impl SimulationConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Unset variables keep their defaults; set but malformed ones are errors.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DELAY_MS_VAR) {
            config.delay = Duration::from_millis(parse_var(DELAY_MS_VAR, &value)?);
        }

        if let Some(value) = lookup(FAILURE_THRESHOLD_VAR) {
            let threshold: f64 = parse_var(FAILURE_THRESHOLD_VAR, &value)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(NetToolError::Config {
                    key: FAILURE_THRESHOLD_VAR.to_string(),
                    message: format!("{} is outside 0.0-1.0", threshold),
                });
            }
            config.failure_threshold = threshold;
        }

        if let Some(value) = lookup(LOOKUP_TIMEOUT_MS_VAR) {
            config.lookup_timeout =
                Duration::from_millis(parse_var(LOOKUP_TIMEOUT_MS_VAR, &value)?);
        }

        Ok(config)
    }

    /// Replace the simulated delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| NetToolError::Config {
        key: key.to_string(),
        message: format!("{:?}: {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::from_vars(|_| None).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.delay, Duration::from_millis(1500));
        assert_eq!(config.failure_threshold, 0.3);
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let env = vars(&[
            (DELAY_MS_VAR, "10"),
            (FAILURE_THRESHOLD_VAR, "0.5"),
            (LOOKUP_TIMEOUT_MS_VAR, " 250 "),
        ]);
        let config = SimulationConfig::from_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.delay, Duration::from_millis(10));
        assert_eq!(config.failure_threshold, 0.5);
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_malformed_delay() {
        let env = vars(&[(DELAY_MS_VAR, "soon")]);
        let err = SimulationConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(DELAY_MS_VAR));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let env = vars(&[(FAILURE_THRESHOLD_VAR, "1.5")]);
        assert!(SimulationConfig::from_vars(|k| env.get(k).cloned()).is_err());

        let env = vars(&[(FAILURE_THRESHOLD_VAR, "-0.1")]);
        assert!(SimulationConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_with_delay() {
        let config = SimulationConfig::default().with_delay(Duration::ZERO);
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.failure_threshold, 0.3);
    }
}
