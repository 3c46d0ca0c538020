//! Static zone table
//!
//! The table maps a bare domain name to its record sets. The JSON form
//! matches the built-in table:
//!
//! ```json
//! {
//!   "example.com": {
//!     "A": ["93.184.216.34"],
//!     "MX": [{ "priority": 10, "target": "mail.example.com" }]
//!   }
//! }
//! ```

use crate::{DnsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Record types known to the simulated resolver, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "MX")]
    Mx,
    #[serde(rename = "TXT")]
    Txt,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        };
        f.write_str(name)
    }
}

/// A single record value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    /// Mail exchanger
    Mx { priority: u16, target: String },
    /// Address or text value
    Value(String),
}

impl Record {
    fn value(value: &str) -> Self {
        Record::Value(value.to_string())
    }

    fn mx(priority: u16, target: &str) -> Self {
        Record::Mx {
            priority,
            target: target.to_string(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Mx { priority, target } => write!(f, "{} (Priority: {})", target, priority),
            Record::Value(value) => f.write_str(value),
        }
    }
}

/// All records of one type for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub record_type: RecordType,
    pub records: Vec<Record>,
}

type DomainRecords = BTreeMap<RecordType, Vec<Record>>;

/// Case-fold a domain name for storage and lookup
pub(crate) fn fold_case(domain: &str) -> String {
    domain.to_lowercase()
}

/// Domain name to record sets
///
/// Keys are stored case-folded, so names differing only in case share
/// one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ZoneTable {
    domains: BTreeMap<String, DomainRecords>,
}

impl ZoneTable {
    /// The two domains every NetTool build knows about
    pub fn builtin() -> Self {
        let mut zone = Self::default();

        zone.insert("example.com", RecordType::A, vec![Record::value("93.184.216.34")]);
        zone.insert(
            "example.com",
            RecordType::Aaaa,
            vec![Record::value("2606:2800:220:1:248:1893:25c8:1946")],
        );
        zone.insert("example.com", RecordType::Mx, vec![Record::mx(10, "mail.example.com")]);
        zone.insert(
            "example.com",
            RecordType::Txt,
            vec![Record::value("v=spf1 include:_spf.example.com ~all")],
        );

        zone.insert(
            "google.com",
            RecordType::A,
            vec![
                Record::value("142.250.191.14"),
                Record::value("172.217.169.14"),
            ],
        );
        zone.insert(
            "google.com",
            RecordType::Aaaa,
            vec![Record::value("2607:f8b0:4005:809::200e")],
        );
        zone.insert("google.com", RecordType::Mx, vec![Record::mx(10, "smtp.google.com")]);

        zone
    }

    /// Parse a zone table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, DomainRecords> =
            serde_json::from_str(json).map_err(|e| DnsError::InvalidZone(e.to_string()))?;

        let mut zone = Self::default();
        for (domain, sets) in raw {
            for (record_type, records) in sets {
                zone.insert(&domain, record_type, records);
            }
        }
        Ok(zone)
    }

    /// Load a zone table from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DnsError::InvalidZone(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Add records of one type to a domain
    pub fn insert(&mut self, domain: &str, record_type: RecordType, records: Vec<Record>) {
        self.domains
            .entry(fold_case(domain))
            .or_default()
            .entry(record_type)
            .or_default()
            .extend(records);
    }

    /// Record sets for a domain name, in display order
    pub fn get(&self, domain: &str) -> Option<Vec<RecordSet>> {
        self.domains.get(&fold_case(domain)).map(|sets| {
            sets.iter()
                .map(|(record_type, records)| RecordSet {
                    record_type: *record_type,
                    records: records.clone(),
                })
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_domains() {
        let zone = ZoneTable::builtin();
        assert_eq!(zone.len(), 2);

        let example = zone.get("example.com").unwrap();
        let types: Vec<RecordType> = example.iter().map(|s| s.record_type).collect();
        assert_eq!(
            types,
            vec![RecordType::A, RecordType::Aaaa, RecordType::Mx, RecordType::Txt]
        );

        let google = zone.get("google.com").unwrap();
        assert_eq!(google.len(), 3);
        assert_eq!(google[0].records.len(), 2);
    }

    #[test]
    fn test_unknown_domain() {
        assert!(ZoneTable::builtin().get("example.org").is_none());
    }

    #[test]
    fn test_record_display() {
        assert_eq!(Record::value("93.184.216.34").to_string(), "93.184.216.34");
        assert_eq!(
            Record::mx(10, "mail.example.com").to_string(),
            "mail.example.com (Priority: 10)"
        );
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "Corp.Example": {
                "TXT": ["hello"],
                "A": ["10.0.0.1"],
                "MX": [{"priority": 5, "target": "mx.corp.example"}]
            }
        }"#;
        let zone = ZoneTable::from_json(json).unwrap();
        let sets = zone.get("corp.example").unwrap();

        assert_eq!(sets[0].record_type, RecordType::A);
        assert_eq!(sets[1].records, vec![Record::mx(5, "mx.corp.example")]);
        assert_eq!(sets[2].records, vec![Record::value("hello")]);
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = ZoneTable::from_json(r#"{"a.example": {"SRV": ["x"]}}"#).unwrap_err();
        assert!(matches!(err, DnsError::InvalidZone(_)));
    }

    #[test]
    fn test_from_missing_path() {
        let err = ZoneTable::from_path(Path::new("/nonexistent/zone.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/zone.json"));
    }

    #[test]
    fn test_from_json_merges_names_differing_in_case() {
        let json = r#"{
            "Example.com": {"A": ["10.0.0.1"]},
            "example.com": {"TXT": ["hello"], "A": ["10.0.0.2"]}
        }"#;
        let zone = ZoneTable::from_json(json).unwrap();
        assert_eq!(zone.len(), 1);

        let sets = zone.get("example.com").unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].record_type, RecordType::A);
        assert_eq!(sets[0].records.len(), 2);
        assert_eq!(sets[1].records, vec![Record::value("hello")]);
    }

    #[test]
    fn test_non_ascii_names_match_normalized_lookups() {
        let zone = ZoneTable::from_json(r#"{"BÜCHER.de": {"A": ["10.0.0.7"]}}"#).unwrap();
        let domain = crate::normalize_domain("https://www.BÜCHER.de/shop");

        assert_eq!(domain, "bücher.de");
        let sets = zone.get(&domain).unwrap();
        assert_eq!(sets[0].records, vec![Record::value("10.0.0.7")]);
    }

    #[test]
    fn test_builtin_json_round_trip() {
        let zone = ZoneTable::builtin();
        let json = serde_json::to_string(&zone).expect("serialization failed");
        assert_eq!(ZoneTable::from_json(&json).unwrap(), zone);
    }
}
