//! Simulated DNS lookup for NetTool
//!
//! Answers come from a static [`ZoneTable`] after a fixed delay; nothing
//! is sent on the wire. Input is normalized the way people paste it:
//! - Case-insensitive
//! - Leading `http://` / `https://` and `www.` are ignored
//! - Anything after the first `/` is ignored
//!
//! # Examples
//!
//! ```no_run
//! use nettool_dns::MockResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = MockResolver::new();
//!     let answer = resolver.lookup("https://www.example.com/index.html").await?;
//!     for set in answer.records {
//!         println!("{} Records: {:?}", set.record_type, set.records);
//!     }
//!     Ok(())
//! }
//! ```

use nettool_core::config::SimulationConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod zone;

pub use zone::{Record, RecordSet, RecordType, ZoneTable};

/// DNS lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// Nothing to look up
    #[error("Please enter a domain name.")]
    EmptyDomain,

    /// Domain is not in the zone table
    #[error("Domain not found or lookup failed.")]
    NotFound(String),

    /// The simulated lookup did not finish in time
    #[error("An error occurred during lookup.")]
    LookupFailed(Duration),

    /// Zone table could not be loaded
    #[error("Invalid zone table: {0}")]
    InvalidZone(String),
}

pub type Result<T> = std::result::Result<T, DnsError>;

/// Records found for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    /// Normalized domain name that was looked up
    pub domain: String,
    pub records: Vec<RecordSet>,
}

/// Reduce user input to a bare domain name
///
/// ```
/// use nettool_dns::normalize_domain;
///
/// assert_eq!(normalize_domain("HTTPS://www.Example.com/path"), "example.com");
/// ```
pub fn normalize_domain(input: &str) -> String {
    let lowered = zone::fold_case(input.trim());
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);

    without_www
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// DNS resolver answering from a static zone table
pub struct MockResolver {
    zone: Arc<ZoneTable>,
    delay: Duration,
    timeout: Duration,
}

impl MockResolver {
    /// Create a resolver over the built-in zone with default settings
    ///
    /// # Examples
    ///
    /// ```
    /// use nettool_dns::MockResolver;
    ///
    /// let resolver = MockResolver::new();
    /// assert_eq!(resolver.zone().len(), 2);
    /// ```
    pub fn new() -> Self {
        Self::from_config(&SimulationConfig::default())
    }

    /// Create a resolver over the built-in zone
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            zone: Arc::new(ZoneTable::builtin()),
            delay: config.delay,
            timeout: config.lookup_timeout,
        }
    }

    /// Answer from a different zone table
    pub fn with_zone(mut self, zone: ZoneTable) -> Self {
        self.zone = Arc::new(zone);
        self
    }

    pub fn zone(&self) -> &ZoneTable {
        &self.zone
    }

    /// Look up every record type for a domain
    ///
    /// # Arguments
    ///
    /// * `domain` - Domain name, optionally with scheme, `www.` or path
    pub async fn lookup(&self, domain: &str) -> Result<LookupResult> {
        if domain.trim().is_empty() {
            return Err(DnsError::EmptyDomain);
        }

        let name = normalize_domain(domain);
        tracing::debug!(input = domain, domain = %name, "simulating dns lookup");

        tokio::time::timeout(self.timeout, self.answer(name))
            .await
            .map_err(|_| DnsError::LookupFailed(self.timeout))?
    }

    async fn answer(&self, name: String) -> Result<LookupResult> {
        tokio::time::sleep(self.delay).await;

        match self.zone.get(&name) {
            Some(records) => Ok(LookupResult {
                domain: name,
                records,
            }),
            None => {
                tracing::debug!(domain = %name, "domain not in zone table");
                Err(DnsError::NotFound(name))
            }
        }
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}
