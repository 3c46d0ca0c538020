use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use nettool_core::Tab;
use nettool_dns::LookupResult;
use nettool_subnet::SubnetResult;
use nettool_telnet::TelnetReport;
use serde::Serialize;

use crate::batch::BatchResult;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

/// A result the CLI knows how to print in every format
pub trait Render: Serialize {
    /// Heading above the human-readable output
    fn title() -> &'static str;
    fn print_human(&self);
    fn csv_header() -> Vec<&'static str>;
    fn csv_rows(&self) -> Vec<Vec<String>>;
}

pub fn print_result<T: Render>(result: &T, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => result.print_human(),
        OutputFormat::Json => print_json(result, true)?,
        OutputFormat::JsonCompact => print_json(result, false)?,
        OutputFormat::Csv => print_csv(result)?,
    }
    Ok(())
}

fn print_json<T: Serialize>(result: &T, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}

fn print_csv<T: Render>(result: &T) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(T::csv_header())?;
    for row in result.csv_rows() {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
}

const SUBNET_COLUMNS: [&str; 8] = [
    "address",
    "prefix_len",
    "network_address",
    "broadcast_address",
    "subnet_mask",
    "first_host",
    "last_host",
    "total_hosts",
];

fn subnet_fields(result: &SubnetResult) -> Vec<String> {
    vec![
        result.address.to_string(),
        result.prefix_len.to_string(),
        result.network_address.to_string(),
        result.broadcast_address.to_string(),
        result.subnet_mask.to_string(),
        result.first_host.to_string(),
        result.last_host.to_string(),
        result.total_hosts.to_string(),
    ]
}

impl Render for SubnetResult {
    fn title() -> &'static str {
        Tab::Subnetting.title()
    }

    fn print_human(&self) {
        heading(Self::title());
        println!("{:>18}: {}/{}", "Input".bold(), self.address, self.prefix_len);
        println!("{:>18}: {}", "Network Address".bold(), self.network_address.to_string().green());
        println!("{:>18}: {}", "Broadcast Address".bold(), self.broadcast_address);
        println!("{:>18}: {}", "First Host".bold(), self.first_host);
        println!("{:>18}: {}", "Last Host".bold(), self.last_host);
        println!("{:>18}: {}", "Subnet Mask".bold(), self.subnet_mask);
        println!("{:>18}: {}", "Total Hosts".bold(), self.total_hosts);
        println!();
    }

    fn csv_header() -> Vec<&'static str> {
        SUBNET_COLUMNS.to_vec()
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![subnet_fields(self)]
    }
}

impl Render for TelnetReport {
    fn title() -> &'static str {
        Tab::Telnet.title()
    }

    fn print_human(&self) {
        heading(Self::title());
        println!("{:>18}: {}:{}", "Target".bold(), self.host, self.port);
        let status = match self.status {
            nettool_telnet::ConnectionStatus::Connected => self.status.to_string().green(),
            nettool_telnet::ConnectionStatus::Failed => self.status.to_string().red(),
            _ => self.status.to_string().normal(),
        };
        println!("{:>18}: {}", "Connection Status".bold(), status);
        println!("{}", "─".repeat(50).dimmed());
        if self.log.is_empty() {
            println!("{}", "Waiting for connection...".dimmed());
        }
        for line in &self.log {
            println!("{}", line.green());
        }
        println!();
    }

    fn csv_header() -> Vec<&'static str> {
        vec!["host", "port", "status", "log"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.host.clone(),
            self.port.to_string(),
            self.status.to_string(),
            self.log.join(" | "),
        ]]
    }
}

impl Render for LookupResult {
    fn title() -> &'static str {
        Tab::DnsLookup.title()
    }

    fn print_human(&self) {
        heading(Self::title());
        println!("{:>18}: {}", "Domain".bold(), self.domain);
        for set in &self.records {
            println!();
            println!("{}", format!("{} Records", set.record_type).bold());
            for record in &set.records {
                println!("  • {}", record);
            }
        }
        println!();
    }

    fn csv_header() -> Vec<&'static str> {
        vec!["domain", "type", "value"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .flat_map(|set| {
                set.records.iter().map(move |record| {
                    vec![
                        self.domain.clone(),
                        set.record_type.to_string(),
                        record.to_string(),
                    ]
                })
            })
            .collect()
    }
}

impl Render for Vec<BatchResult> {
    fn title() -> &'static str {
        "Batch Subnetting"
    }

    fn print_human(&self) {
        heading(Self::title());
        for entry in self {
            match (&entry.result, &entry.error) {
                (Some(result), _) => println!(
                    "{:<20} {:<20} {:>15} - {:<15} {:>10} hosts",
                    entry.input,
                    result.cidr().green(),
                    result.first_host,
                    result.last_host,
                    result.total_hosts.to_string()
                ),
                (None, Some(error)) => println!("{:<20} {}", entry.input, error.red()),
                (None, None) => println!("{:<20}", entry.input),
            }
        }
        println!();
    }

    fn csv_header() -> Vec<&'static str> {
        let mut header = vec!["input"];
        header.extend(SUBNET_COLUMNS);
        header.push("error");
        header
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|entry| {
                let mut row = vec![entry.input.clone()];
                match &entry.result {
                    Some(result) => row.extend(subnet_fields(result)),
                    None => row.extend(SUBNET_COLUMNS.iter().map(|_| String::new())),
                }
                row.push(entry.error.clone().unwrap_or_default());
                row
            })
            .collect()
    }
}
