use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use nettool_core::config::SimulationConfig;
use nettool_dns::{MockResolver, ZoneTable};
use nettool_rpc::transport::StdioTransport;
use nettool_rpc::RpcServer;
use nettool_telnet::{Target, TelnetReport, TelnetTester};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod batch;
mod logging;
mod output;

use batch::BatchProcessor;
use output::{print_result, OutputFormat};

/// Subnet calculator with simulated Telnet and DNS tools
#[derive(Parser)]
#[command(name = "nettool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Simulated latency in milliseconds (overrides NETTOOL_DELAY_MS)
    #[arg(long, value_name = "MS", global = true)]
    delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate network, broadcast, host range and mask for an IPv4 subnet
    Subnet(SubnetArgs),
    /// Simulate a Telnet connection attempt
    Telnet(TelnetArgs),
    /// Simulate a DNS lookup
    Dns(DnsArgs),
    /// Calculate many subnets from a file or stdin
    Batch(BatchArgs),
    /// Serve JSON-RPC requests over stdio
    Serve,
}

#[derive(Parser)]
struct SubnetArgs {
    /// IPv4 address (e.g., 192.168.1.1)
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// CIDR prefix length (e.g., 24)
    #[arg(value_name = "PREFIX", allow_hyphen_values = true)]
    prefix: String,
}

#[derive(Parser)]
struct TelnetArgs {
    /// Host name or IP address
    #[arg(value_name = "HOST")]
    host: String,

    /// Port (1-65535)
    #[arg(value_name = "PORT", allow_hyphen_values = true)]
    port: String,
}

#[derive(Parser)]
struct DnsArgs {
    /// Domain name (e.g., example.com)
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// JSON zone table to answer from instead of the built-in one
    #[arg(long, value_name = "FILE")]
    zone_file: Option<PathBuf>,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Number of worker threads
    #[arg(short, long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let mut config = SimulationConfig::from_env()?;
    if let Some(ms) = cli.delay_ms {
        config = config.with_delay(Duration::from_millis(ms));
    }
    tracing::debug!(?config, "loaded simulation config");

    match cli.command {
        Commands::Subnet(args) => handle_subnet(args, &cli.output)?,
        Commands::Telnet(args) => handle_telnet(args, &cli.output, &config).await?,
        Commands::Dns(args) => handle_dns(args, &cli.output, &config).await?,
        Commands::Batch(args) => handle_batch(args, &cli.output)?,
        Commands::Serve => handle_serve(&config).await?,
    }

    Ok(())
}

fn handle_subnet(args: SubnetArgs, format: &OutputFormat) -> Result<()> {
    let result = nettool_subnet::calculate(&args.address, &args.prefix)?;
    print_result(&result, format)
}

async fn handle_telnet(
    args: TelnetArgs,
    format: &OutputFormat,
    config: &SimulationConfig,
) -> Result<()> {
    let target = Target::parse(&args.host, &args.port)?;
    let tester = TelnetTester::from_config(config);

    if matches!(format, OutputFormat::Human) {
        let pending = TelnetReport::pending(&target);
        eprintln!("{} Connection Status: {}", "›".blue(), pending.status);
    }

    let report = tester.connect_to(&target).await;
    print_result(&report, format)
}

async fn handle_dns(args: DnsArgs, format: &OutputFormat, config: &SimulationConfig) -> Result<()> {
    let mut resolver = MockResolver::from_config(config);
    if let Some(ref path) = args.zone_file {
        resolver = resolver.with_zone(ZoneTable::from_path(path)?);
    }

    if matches!(format, OutputFormat::Human) {
        eprintln!("{} Looking up...", "›".blue());
    }

    let answer = resolver.lookup(&args.domain).await?;
    print_result(&answer, format)
}

fn handle_batch(args: BatchArgs, format: &OutputFormat) -> Result<()> {
    let processor = BatchProcessor::new(args.workers)?;
    tracing::info!(
        threads = processor.thread_count(),
        source = args.file.as_deref().unwrap_or("stdin"),
        "batch processing"
    );

    let lines = batch::read_inputs(args.file.as_deref())?;
    let results = processor.process(lines);
    print_result(&results, format)
}

async fn handle_serve(config: &SimulationConfig) -> Result<()> {
    tracing::info!("serving JSON-RPC on stdio");
    let server = Arc::new(RpcServer::from_config(config));
    StdioTransport::new(server).run().await?;
    Ok(())
}
