//! Core types for NetTool
//!
//! This crate provides the pieces shared by every NetTool front end:
//! - [`Tab`] - The tool panels a front end can switch between
//! - [`Panel`] - "Last result or error" state owned by a front end
//! - [`config::SimulationConfig`] - Latency and outcome knobs for the simulated tools
//! - [`NetToolError`] - Error types
//!
//! ```
//! use nettool_core::{Panel, Tab};
//!
//! let mut panel: Panel<u32> = Panel::new();
//! panel.replace(Ok::<_, String>(254));
//! assert_eq!(panel.result(), Some(&254));
//! assert_eq!(Tab::default(), Tab::Subnetting);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
mod panel;

pub use panel::Panel;

/// A tool panel
///
/// Front ends show exactly one tab at a time. The subnet calculator is
/// the landing tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// IPv4 subnet calculator
    #[default]
    Subnetting,
    /// Simulated Telnet connection tester
    Telnet,
    /// Simulated DNS lookup
    #[serde(rename = "dnslookup")]
    DnsLookup,
}

impl Tab {
    /// All tabs in display order
    pub const ALL: [Tab; 3] = [Tab::Subnetting, Tab::Telnet, Tab::DnsLookup];

    /// Human-readable tab title
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Subnetting => "Subnetting",
            Tab::Telnet => "Telnet",
            Tab::DnsLookup => "DNS Lookup",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Tab::Subnetting => "subnetting",
            Tab::Telnet => "telnet",
            Tab::DnsLookup => "dnslookup",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tab {
    type Err = NetToolError;

    fn from_str(s: &str) -> Result<Self> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NetToolError::UnknownTab(s.to_string()))
    }
}

/// Error types for NetTool operations
#[derive(Error, Debug)]
pub enum NetToolError {
    /// Unknown tab name
    #[error("Unknown tab: {0} (expected subnetting, telnet or dnslookup)")]
    UnknownTab(String),

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },
}

/// Result type alias for NetTool operations
pub type Result<T> = std::result::Result<T, NetToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab() {
        assert_eq!(Tab::default(), Tab::Subnetting);
    }

    #[test]
    fn test_tab_from_str() {
        assert_eq!("telnet".parse::<Tab>().unwrap(), Tab::Telnet);
        assert_eq!("DNSLookup".parse::<Tab>().unwrap(), Tab::DnsLookup);
        assert_eq!(" subnetting ".parse::<Tab>().unwrap(), Tab::Subnetting);
        assert!("ping".parse::<Tab>().is_err());
    }

    #[test]
    fn test_tab_display_round_trips() {
        for tab in Tab::ALL {
            assert_eq!(tab.to_string().parse::<Tab>().unwrap(), tab);
        }
    }

    #[test]
    fn test_tab_titles() {
        assert_eq!(Tab::Subnetting.title(), "Subnetting");
        assert_eq!(Tab::DnsLookup.title(), "DNS Lookup");
    }

    #[test]
    fn test_tab_serialization() {
        let json = serde_json::to_string(&Tab::DnsLookup).expect("serialization failed");
        assert_eq!(json, r#""dnslookup""#);

        let tab: Tab = serde_json::from_str(r#""telnet""#).expect("deserialization failed");
        assert_eq!(tab, Tab::Telnet);
    }

    #[test]
    fn test_error_display() {
        let err = NetToolError::UnknownTab("ping".to_string());
        assert_eq!(
            format!("{}", err),
            "Unknown tab: ping (expected subnetting, telnet or dnslookup)"
        );

        let err = NetToolError::Config {
            key: "NETTOOL_DELAY_MS".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid configuration for NETTOOL_DELAY_MS: not a number"
        );
    }
}
