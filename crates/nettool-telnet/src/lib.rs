//! Simulated Telnet connection tester
//!
//! No socket is ever opened. A connection attempt validates host and port,
//! waits the configured delay and then succeeds or fails at random:
//! - Validate host and port (1-65535)
//! - Wait the simulated latency
//! - Roll against the failure threshold
//! - Report a status line and a short connection log
//!
//! # Examples
//!
//! ```no_run
//! use nettool_telnet::TelnetTester;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tester = TelnetTester::new();
//! let report = tester.connect("example.com", "23").await?;
//! println!("{}", report.status);
//! # Ok(())
//! # }
//! ```

use nettool_core::config::SimulationConfig;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Telnet input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelnetError {
    /// Host or port left empty
    #[error("Please enter a host and port.")]
    MissingInput,

    /// Port does not start with an integer in 1-65535
    #[error("Please enter a valid port (1-65535).")]
    InvalidPort(String),
}

pub type Result<T> = std::result::Result<T, TelnetError>;

/// Connection status as shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    #[default]
    #[serde(rename = "Disconnected")]
    Disconnected,
    #[serde(rename = "Connecting...")]
    Connecting,
    #[serde(rename = "Connected!")]
    Connected,
    #[serde(rename = "Connection Failed")]
    Failed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected!",
            ConnectionStatus::Failed => "Connection Failed",
        };
        f.write_str(text)
    }
}

/// Validated connection target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub host: String,
    pub port: u16,
    /// Port as typed, echoed back in the connection log
    pub port_text: String,
}

impl Target {
    /// Validate host and port text
    ///
    /// Emptiness is checked before the port range. The port is read from
    /// its leading integer, so `23.5` and `23/tcp` both mean port 23.
    pub fn parse(host: &str, port: &str) -> Result<Self> {
        let host = host.trim();
        let port_text = port.trim();
        if host.is_empty() || port_text.is_empty() {
            return Err(TelnetError::MissingInput);
        }

        let port = leading_integer(port_text)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p >= 1)
            .ok_or_else(|| TelnetError::InvalidPort(port_text.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port,
            port_text: port_text.to_string(),
        })
    }
}

/// Integer at the start of `text`, ignoring whatever follows it
///
/// Accepts an optional sign and a `0x` prefix for hex. Values too large
/// for an `i64` saturate.
fn leading_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outcome of one simulated connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelnetReport {
    pub host: String,
    pub port: u16,
    pub status: ConnectionStatus,
    pub log: Vec<String>,
}

impl TelnetReport {
    /// Report for an attempt still in flight: status set, log cleared
    pub fn pending(target: &Target) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            status: ConnectionStatus::Connecting,
            log: Vec::new(),
        }
    }

    fn finished(target: &Target, connected: bool) -> Self {
        let attempt = format!(
            "Attempting to connect to {} on port {}...",
            target.host, target.port_text
        );
        let (status, outcome) = if connected {
            (
                ConnectionStatus::Connected,
                format!("Connected to {}:{}.", target.host, target.port_text),
            )
        } else {
            (
                ConnectionStatus::Failed,
                "Connection failed: Timeout or host unreachable.".to_string(),
            )
        };

        Self {
            host: target.host.clone(),
            port: target.port,
            status,
            log: vec![attempt, outcome],
        }
    }
}

/// Source of the uniform [0, 1) roll deciding a connection outcome
pub trait Roll: Send + Sync {
    fn roll(&self) -> f64;
}

/// Roll backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRoll;

impl Roll for RandomRoll {
    fn roll(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Always rolls the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub f64);

impl Roll for FixedRoll {
    fn roll(&self) -> f64 {
        self.0
    }
}

/// Simulated Telnet client
pub struct TelnetTester {
    delay: Duration,
    failure_threshold: f64,
    roll: Arc<dyn Roll>,
}

impl TelnetTester {
    /// Create a tester with the default simulation settings
    ///
    /// # Examples
    ///
    /// ```
    /// use nettool_telnet::TelnetTester;
    ///
    /// let tester = TelnetTester::new();
    /// ```
    pub fn new() -> Self {
        Self::from_config(&SimulationConfig::default())
    }

    /// Create a tester from explicit simulation settings
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            delay: config.delay,
            failure_threshold: config.failure_threshold,
            roll: Arc::new(RandomRoll),
        }
    }

    /// Replace the roll source
    pub fn with_roll<R: Roll + 'static>(mut self, roll: R) -> Self {
        self.roll = Arc::new(roll);
        self
    }

    /// Simulated latency of every attempt
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Simulate a connection attempt
    ///
    /// # Arguments
    ///
    /// * `host` - Host name or IP address
    /// * `port` - Port number as text
    pub async fn connect(&self, host: &str, port: &str) -> Result<TelnetReport> {
        let target = Target::parse(host, port)?;
        Ok(self.connect_to(&target).await)
    }

    /// Simulate a connection attempt to a validated target
    pub async fn connect_to(&self, target: &Target) -> TelnetReport {
        tracing::debug!(%target, delay = ?self.delay, "simulating telnet connection");
        tokio::time::sleep(self.delay).await;

        let connected = self.roll.roll() > self.failure_threshold;
        let report = TelnetReport::finished(target, connected);
        tracing::info!(%target, status = %report.status, "simulated telnet attempt finished");
        report
    }
}

impl Default for TelnetTester {
    fn default() -> Self {
        Self::new()
    }
}
